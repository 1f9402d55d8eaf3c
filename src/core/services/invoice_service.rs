//! Rolling monthly invoice projection for credit cards.
//!
//! Invoices are never stored; each call recomputes them from the card and
//! its matching ledger entries.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{AccountScope, CardInvoice, CreditCard, InvoiceStatus};
use crate::errors::{CoreError, Result};
use crate::ledger::calendar::MonthRef;
use crate::ledger::Ledger;

/// Number of billing periods the rolling window covers.
const INVOICE_WINDOW: i32 = 3;

pub struct InvoiceService;

impl InvoiceService {
    /// The last three invoice periods ending at the current month, newest
    /// first. Status follows recency rank: the current month is open, the
    /// previous one closed, anything older paid.
    pub fn recent_invoices(
        ledger: &Ledger,
        scope: AccountScope,
        card_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<CardInvoice>> {
        let card = Self::card_in_scope(ledger, scope, card_id)?;
        let current = MonthRef::from_date(today);
        Ok((0..INVOICE_WINDOW)
            .map(|rank| Self::build_invoice(ledger, card, current.offset(-rank), rank))
            .collect())
    }

    /// One invoice for an arbitrary month, ranked against the current
    /// month. Future months rank as the open invoice.
    pub fn invoice_for_month(
        ledger: &Ledger,
        scope: AccountScope,
        card_id: Uuid,
        month: MonthRef,
        today: NaiveDate,
    ) -> Result<CardInvoice> {
        let card = Self::card_in_scope(ledger, scope, card_id)?;
        let rank = MonthRef::from_date(today).months_since(month).max(0);
        Ok(Self::build_invoice(ledger, card, month, rank))
    }

    fn card_in_scope(
        ledger: &Ledger,
        scope: AccountScope,
        card_id: Uuid,
    ) -> Result<&CreditCard> {
        // a card outside the queried scope is invisible, not forbidden
        ledger
            .card(card_id)
            .filter(|card| card.scope == scope)
            .ok_or(CoreError::CardNotFound(card_id))
    }

    fn build_invoice(
        ledger: &Ledger,
        card: &CreditCard,
        month: MonthRef,
        rank: i32,
    ) -> CardInvoice {
        let mut total_cents = 0;
        let mut transaction_ids = Vec::new();
        for txn in ledger.transactions_in(card.scope) {
            if txn.is_card_expense(card.id) && month.contains(txn.date) {
                total_cents += txn.amount_cents;
                transaction_ids.push(txn.id);
            }
        }
        let status = match rank {
            0 => InvoiceStatus::Open,
            1 => InvoiceStatus::Closed,
            _ => InvoiceStatus::Paid,
        };
        CardInvoice {
            card_id: card.id,
            month,
            total_cents,
            due_date: month.day_clamped(card.due_day),
            status,
            transaction_ids,
        }
    }
}
