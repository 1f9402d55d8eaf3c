use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{AccountScope, EntryKind};
use crate::ledger::calendar::shift_months;

/// How often an obligation repeats. Settling a repeating obligation spawns
/// the next pending occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Once,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Next scheduled date after `from`, or `None` for one-shot items.
    /// Month and year steps clamp the day to the target month's length.
    pub fn next_date(self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::Once => None,
            Recurrence::Weekly => Some(from + Duration::days(7)),
            Recurrence::Monthly => Some(shift_months(from, 1)),
            Recurrence::Yearly => Some(shift_months(from, 12)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Pending,
    Received,
    Overdue,
}

/// Money the user owes, with a due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub description: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub category_id: Uuid,
    pub status: BillStatus,
    pub recurrence: Recurrence,
    pub scope: AccountScope,
}

impl Bill {
    pub fn new(
        description: impl Into<String>,
        amount_cents: i64,
        due_date: NaiveDate,
        category_id: Uuid,
        recurrence: Recurrence,
        scope: AccountScope,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount_cents,
            due_date,
            category_id,
            status: BillStatus::Pending,
            recurrence,
            scope,
        }
    }

    /// The next pending instance of a repeating bill, stepped from the
    /// scheduled due date regardless of when settlement happened.
    pub fn next_occurrence(&self) -> Option<Bill> {
        let due_date = self.recurrence.next_date(self.due_date)?;
        Some(Bill {
            id: Uuid::new_v4(),
            status: BillStatus::Pending,
            due_date,
            ..self.clone()
        })
    }
}

/// Money owed to the user, with an expected date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receivable {
    pub id: Uuid,
    pub description: String,
    pub amount_cents: i64,
    pub expected_date: NaiveDate,
    pub category_id: Uuid,
    pub status: ReceivableStatus,
    pub recurrence: Recurrence,
    pub scope: AccountScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl Receivable {
    pub fn new(
        description: impl Into<String>,
        amount_cents: i64,
        expected_date: NaiveDate,
        category_id: Uuid,
        recurrence: Recurrence,
        scope: AccountScope,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount_cents,
            expected_date,
            category_id,
            status: ReceivableStatus::Pending,
            recurrence,
            scope,
            payer: None,
        }
    }

    pub fn with_payer(mut self, payer: impl Into<String>) -> Self {
        self.payer = Some(payer.into());
        self
    }

    pub fn next_occurrence(&self) -> Option<Receivable> {
        let expected_date = self.recurrence.next_date(self.expected_date)?;
        Some(Receivable {
            id: Uuid::new_v4(),
            status: ReceivableStatus::Pending,
            expected_date,
            ..self.clone()
        })
    }
}

/// Urgency of a still-pending obligation relative to a reference day.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

const DUE_SOON_DAYS: i64 = 3;

impl DueStatus {
    /// An item due today is `DueSoon`, not `Overdue`.
    pub fn classify(due: NaiveDate, today: NaiveDate) -> DueStatus {
        let days = (due - today).num_days();
        if days < 0 {
            DueStatus::Overdue
        } else if days <= DUE_SOON_DAYS {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        }
    }
}

/// Common surface of bills and receivables, so scheduling code handles
/// both sides symmetrically.
pub trait Obligation {
    fn id(&self) -> Uuid;
    fn description(&self) -> &str;
    fn amount_cents(&self) -> i64;
    fn category_id(&self) -> Uuid;
    fn scope(&self) -> AccountScope;
    fn due_date(&self) -> NaiveDate;
    fn recurrence(&self) -> Recurrence;
    fn is_pending(&self) -> bool;
    /// The ledger direction a settlement materializes: expense for bills,
    /// income for receivables.
    fn entry_kind(&self) -> EntryKind;
}

impl Obligation for Bill {
    fn id(&self) -> Uuid {
        self.id
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn amount_cents(&self) -> i64 {
        self.amount_cents
    }
    fn category_id(&self) -> Uuid {
        self.category_id
    }
    fn scope(&self) -> AccountScope {
        self.scope
    }
    fn due_date(&self) -> NaiveDate {
        self.due_date
    }
    fn recurrence(&self) -> Recurrence {
        self.recurrence
    }
    fn is_pending(&self) -> bool {
        self.status == BillStatus::Pending
    }
    fn entry_kind(&self) -> EntryKind {
        EntryKind::Expense
    }
}

impl Obligation for Receivable {
    fn id(&self) -> Uuid {
        self.id
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn amount_cents(&self) -> i64 {
        self.amount_cents
    }
    fn category_id(&self) -> Uuid {
        self.category_id
    }
    fn scope(&self) -> AccountScope {
        self.scope
    }
    fn due_date(&self) -> NaiveDate {
        self.expected_date
    }
    fn recurrence(&self) -> Recurrence {
        self.recurrence
    }
    fn is_pending(&self) -> bool {
        self.status == ReceivableStatus::Pending
    }
    fn entry_kind(&self) -> EntryKind {
        EntryKind::Income
    }
}
