use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::AccountScope;
use crate::ledger::calendar::MonthRef;

/// A credit card whose monthly invoices are derived from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreditCard {
    pub id: Uuid,
    pub name: String,
    pub last_digits: String,
    pub brand: String,
    pub limit_cents: i64,
    /// Outstanding credit-card expense total. Increased when matching
    /// entries are created; never decremented by the engine.
    pub used_cents: i64,
    /// Day of month the invoice is due, 1..=31 (clamped to month length).
    pub due_day: u32,
    /// Day of month the invoice closes, 1..=31.
    pub closing_day: u32,
    pub scope: AccountScope,
}

impl CreditCard {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        last_digits: impl Into<String>,
        brand: impl Into<String>,
        limit_cents: i64,
        due_day: u32,
        closing_day: u32,
        scope: AccountScope,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            last_digits: last_digits.into(),
            brand: brand.into(),
            limit_cents,
            used_cents: 0,
            due_day,
            closing_day,
            scope,
        }
    }

    pub fn register_charge(&mut self, amount_cents: i64) {
        self.used_cents += amount_cents;
    }

    pub fn available_cents(&self) -> i64 {
        self.limit_cents - self.used_cents
    }
}

/// Lifecycle of a monthly invoice. Assigned by recency rank; `Overdue`
/// exists for the wire model but the rank rule never emits it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Open,
    Closed,
    Paid,
    Overdue,
}

/// One month of a card's billing cycle, recomputed from the ledger on
/// every read and never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CardInvoice {
    pub card_id: Uuid,
    pub month: MonthRef,
    pub total_cents: i64,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub transaction_ids: Vec<Uuid>,
}
