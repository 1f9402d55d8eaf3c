//! Due-date scheduling for bills and receivables, and the settlement
//! transition that turns them into ledger entries.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::{
    AccountScope, Bill, BillStatus, DueStatus, EntryKind, Obligation, PaymentMethod, Receivable,
    ReceivableStatus, Transaction,
};
use crate::errors::{CoreError, Result};
use crate::ledger::Ledger;

use super::transaction_service::TransactionService;

/// Outcome of settling an obligation: the materialized ledger entry and,
/// for repeating obligations, the spawned next occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub transaction_id: Uuid,
    pub next_occurrence: Option<Uuid>,
}

pub struct ObligationService;

impl ObligationService {
    /// Whole days from `today` until `due`; negative once past due.
    pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
        (due - today).num_days()
    }

    /// Urgency of a single obligation, or `None` once it is settled or
    /// already flagged overdue.
    pub fn due_status(obligation: &dyn Obligation, today: NaiveDate) -> Option<DueStatus> {
        obligation
            .is_pending()
            .then(|| DueStatus::classify(obligation.due_date(), today))
    }

    /// Pending bills of the scope with their urgency, soonest first.
    /// Consumed by the external reminder channel.
    pub fn pending_bills(
        ledger: &Ledger,
        scope: AccountScope,
        today: NaiveDate,
    ) -> Vec<(&Bill, DueStatus)> {
        let mut items: Vec<_> = ledger
            .bills
            .iter()
            .filter(|bill| bill.scope == scope && bill.is_pending())
            .map(|bill| (bill, DueStatus::classify(bill.due_date, today)))
            .collect();
        items.sort_by_key(|(bill, _)| bill.due_date);
        items
    }

    pub fn pending_receivables(
        ledger: &Ledger,
        scope: AccountScope,
        today: NaiveDate,
    ) -> Vec<(&Receivable, DueStatus)> {
        let mut items: Vec<_> = ledger
            .receivables
            .iter()
            .filter(|item| item.scope == scope && item.is_pending())
            .map(|item| (item, DueStatus::classify(item.expected_date, today)))
            .collect();
        items.sort_by_key(|(item, _)| item.expected_date);
        items
    }

    /// Flips stored `Pending` statuses to `Overdue` for past-due items
    /// across both sides of the book. Returns how many changed.
    pub fn refresh_statuses(ledger: &mut Ledger, today: NaiveDate) -> usize {
        let mut flipped = 0;
        for bill in &mut ledger.bills {
            if bill.status == BillStatus::Pending && bill.due_date < today {
                bill.status = BillStatus::Overdue;
                flipped += 1;
            }
        }
        for receivable in &mut ledger.receivables {
            if receivable.status == ReceivableStatus::Pending && receivable.expected_date < today {
                receivable.status = ReceivableStatus::Overdue;
                flipped += 1;
            }
        }
        if flipped > 0 {
            ledger.touch();
            tracing::debug!(flipped, "obligations moved to overdue");
        }
        flipped
    }

    pub fn add_bill(ledger: &mut Ledger, bill: Bill) -> Result<Uuid> {
        Self::validate(ledger, &bill)?;
        Ok(ledger.add_bill(bill))
    }

    pub fn add_receivable(ledger: &mut Ledger, receivable: Receivable) -> Result<Uuid> {
        Self::validate(ledger, &receivable)?;
        Ok(ledger.add_receivable(receivable))
    }

    /// Marks the bill paid and materializes exactly one expense entry
    /// dated today. A repeating bill spawns its next pending occurrence,
    /// stepped from the scheduled due date.
    pub fn mark_paid(ledger: &mut Ledger, bill_id: Uuid, clock: &dyn Clock) -> Result<Settlement> {
        let bill = ledger
            .bill(bill_id)
            .ok_or(CoreError::BillNotFound(bill_id))?;
        if bill.status == BillStatus::Paid {
            return Err(CoreError::InvalidOperation("bill already paid".into()));
        }
        let entry = Transaction::new(
            bill.description.clone(),
            bill.amount_cents,
            EntryKind::Expense,
            bill.category_id,
            clock.today(),
            bill.scope,
            PaymentMethod::Transfer,
        );
        let next = bill.next_occurrence();
        // the entry is validated and applied first, so a rejected
        // settlement leaves the bill untouched
        let transaction_id = TransactionService::add(ledger, entry)?;
        if let Some(bill) = ledger.bill_mut(bill_id) {
            bill.status = BillStatus::Paid;
        }
        let next_occurrence = next.map(|bill| ledger.add_bill(bill));
        ledger.touch();
        tracing::info!(%bill_id, %transaction_id, respawned = next_occurrence.is_some(), "bill settled");
        Ok(Settlement {
            transaction_id,
            next_occurrence,
        })
    }

    /// Receivable counterpart of `mark_paid`: materializes an income
    /// entry dated today.
    pub fn mark_received(
        ledger: &mut Ledger,
        receivable_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Settlement> {
        let receivable = ledger
            .receivable(receivable_id)
            .ok_or(CoreError::ReceivableNotFound(receivable_id))?;
        if receivable.status == ReceivableStatus::Received {
            return Err(CoreError::InvalidOperation(
                "receivable already received".into(),
            ));
        }
        let entry = Transaction::new(
            receivable.description.clone(),
            receivable.amount_cents,
            EntryKind::Income,
            receivable.category_id,
            clock.today(),
            receivable.scope,
            PaymentMethod::Transfer,
        );
        let next = receivable.next_occurrence();
        let transaction_id = TransactionService::add(ledger, entry)?;
        if let Some(receivable) = ledger.receivable_mut(receivable_id) {
            receivable.status = ReceivableStatus::Received;
        }
        let next_occurrence = next.map(|receivable| ledger.add_receivable(receivable));
        ledger.touch();
        tracing::info!(%receivable_id, %transaction_id, respawned = next_occurrence.is_some(), "receivable settled");
        Ok(Settlement {
            transaction_id,
            next_occurrence,
        })
    }

    fn validate(ledger: &Ledger, obligation: &dyn Obligation) -> Result<()> {
        if obligation.amount_cents() <= 0 {
            return Err(CoreError::Validation("amount must be positive".into()));
        }
        if obligation.description().trim().is_empty() {
            return Err(CoreError::Validation("description is required".into()));
        }
        let category = ledger.category(obligation.category_id()).ok_or_else(|| {
            CoreError::Validation(format!("unknown category {}", obligation.category_id()))
        })?;
        if category.kind != obligation.entry_kind() {
            return Err(CoreError::Validation(format!(
                "category `{}` does not accept {:?} entries",
                category.name,
                obligation.entry_kind()
            )));
        }
        if !category.scope.covers(obligation.scope()) {
            return Err(CoreError::Validation(format!(
                "category `{}` is not available in {:?} scope",
                category.name,
                obligation.scope()
            )));
        }
        Ok(())
    }
}
