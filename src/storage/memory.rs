//! Local-only storage for trial sessions, plus the demo seed that stands
//! in for persisted data when no backend session exists.

use std::sync::Mutex;

use chrono::{Duration, NaiveDate};

use crate::domain::{
    AccountScope, Bill, CreditCard, EntryKind, Goal, PaymentMethod, Receivable, Recurrence,
    Transaction,
};
use crate::errors::{CoreError, Result};
use crate::ledger::calendar::MonthRef;
use crate::ledger::Ledger;

use super::StorageBackend;

/// Keeps the snapshot in memory; writes never leave the process.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<Ledger>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(ledger: Ledger) -> Self {
        Self {
            snapshot: Mutex::new(Some(ledger)),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<Option<Ledger>> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| CoreError::Storage("memory snapshot poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| CoreError::Storage("memory snapshot poisoned".into()))?;
        *guard = Some(ledger.clone());
        Ok(())
    }
}

/// A synthetic ledger shaped exactly like persisted data, anchored at
/// `today` so its invoices, budgets, and due dates look alive.
pub fn seed_demo_ledger(today: NaiveDate) -> Ledger {
    let mut ledger = Ledger::new("demo");
    let month = MonthRef::from_date(today);

    let salary = find_category(&ledger, "Salary");
    let groceries = find_category(&ledger, "Groceries");
    let transport = find_category(&ledger, "Transport");
    let leisure = find_category(&ledger, "Leisure");

    let card_id = ledger.add_card(CreditCard::new(
        "Everyday card",
        "5301",
        "mastercard",
        800_000,
        10,
        3,
        AccountScope::Personal,
    ));

    ledger.add_transaction(Transaction::new(
        "Monthly salary",
        650_000,
        EntryKind::Income,
        salary,
        month.first_day(),
        AccountScope::Personal,
        PaymentMethod::Transfer,
    ));
    ledger.add_transaction(Transaction::new(
        "Supermarket",
        32_450,
        EntryKind::Expense,
        groceries,
        today - Duration::days(2),
        AccountScope::Personal,
        PaymentMethod::DebitCard,
    ));
    ledger.add_transaction(
        Transaction::new(
            "Ride home",
            4_890,
            EntryKind::Expense,
            transport,
            today - Duration::days(1),
            AccountScope::Personal,
            PaymentMethod::CreditCard,
        )
        .with_card(card_id),
    );
    if let Some(card) = ledger.card_mut(card_id) {
        card.register_charge(4_890);
    }

    ledger.add_bill(Bill::new(
        "Internet",
        9_990,
        today + Duration::days(2),
        find_category(&ledger, "Housing"),
        Recurrence::Monthly,
        AccountScope::Personal,
    ));
    ledger.add_receivable(
        Receivable::new(
            "Freelance article",
            45_000,
            today + Duration::days(6),
            find_category(&ledger, "Other income"),
            Recurrence::Once,
            AccountScope::Personal,
        )
        .with_payer("Weekly Gazette"),
    );

    ledger.add_budget(crate::domain::Budget::new(
        groceries,
        month,
        120_000,
        AccountScope::Personal,
    ));
    ledger.add_budget(crate::domain::Budget::new(
        leisure,
        month,
        40_000,
        AccountScope::Personal,
    ));

    ledger.add_goal(Goal::new("Vacation fund", 300_000));
    ledger
}

/// Demo-mode backend: the seed is local-only and never sent upstream.
pub fn demo_storage(today: NaiveDate) -> MemoryStorage {
    MemoryStorage::with_seed(seed_demo_ledger(today))
}

fn find_category(ledger: &Ledger, name: &str) -> uuid::Uuid {
    ledger
        .categories
        .iter()
        .find(|category| category.name == name)
        .map(|category| category.id)
        .unwrap_or_else(|| {
            // seed tables always contain the built-in names
            ledger.categories[0].id
        })
}
