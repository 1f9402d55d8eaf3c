use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AccountScope, Bill, Budget, Category, CategoryScope, CreditCard, EntryKind, Goal, Receivable,
    Transaction,
};

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Built-in category templates seeded into every new ledger.
static BUILTIN_CATEGORIES: Lazy<Vec<(&'static str, EntryKind, CategoryScope)>> =
    Lazy::new(|| {
        vec![
            ("Salary", EntryKind::Income, CategoryScope::Personal),
            ("Sales", EntryKind::Income, CategoryScope::Business),
            ("Services", EntryKind::Income, CategoryScope::Business),
            ("Other income", EntryKind::Income, CategoryScope::Both),
            ("Housing", EntryKind::Expense, CategoryScope::Personal),
            ("Groceries", EntryKind::Expense, CategoryScope::Personal),
            ("Transport", EntryKind::Expense, CategoryScope::Both),
            ("Health", EntryKind::Expense, CategoryScope::Personal),
            ("Leisure", EntryKind::Expense, CategoryScope::Personal),
            ("Education", EntryKind::Expense, CategoryScope::Both),
            ("Supplies", EntryKind::Expense, CategoryScope::Business),
            ("Payroll", EntryKind::Expense, CategoryScope::Business),
            ("Taxes", EntryKind::Expense, CategoryScope::Both),
            ("Other expenses", EntryKind::Expense, CategoryScope::Both),
        ]
    });

/// Canonical in-memory store: one user's entire financial state. All other
/// engine components are read or write-back functions over this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub cards: Vec<CreditCard>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub receivables: Vec<Receivable>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    /// Creates an empty ledger seeded with the built-in categories.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, kind, scope)| Category::builtin(name, *kind, *scope))
            .collect();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories,
            transactions: Vec::new(),
            cards: Vec::new(),
            bills: Vec::new(),
            receivables: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    // --- categories ---

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Whether any entity still points at the category.
    pub fn category_is_referenced(&self, id: Uuid) -> bool {
        self.transactions.iter().any(|txn| txn.category_id == id)
            || self.bills.iter().any(|bill| bill.category_id == id)
            || self
                .receivables
                .iter()
                .any(|receivable| receivable.category_id == id)
            || self.budgets.iter().any(|budget| budget.category_id == id)
    }

    // --- transactions ---

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn transactions_in(&self, scope: AccountScope) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |txn| txn.scope == scope)
    }

    // --- cards ---

    pub fn add_card(&mut self, card: CreditCard) -> Uuid {
        let id = card.id;
        self.cards.push(card);
        self.touch();
        id
    }

    pub fn card(&self, id: Uuid) -> Option<&CreditCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn card_mut(&mut self, id: Uuid) -> Option<&mut CreditCard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    // --- bills / receivables ---

    pub fn add_bill(&mut self, bill: Bill) -> Uuid {
        let id = bill.id;
        self.bills.push(bill);
        self.touch();
        id
    }

    pub fn bill(&self, id: Uuid) -> Option<&Bill> {
        self.bills.iter().find(|bill| bill.id == id)
    }

    pub fn bill_mut(&mut self, id: Uuid) -> Option<&mut Bill> {
        self.bills.iter_mut().find(|bill| bill.id == id)
    }

    pub fn remove_bill(&mut self, id: Uuid) -> Option<Bill> {
        let index = self.bills.iter().position(|bill| bill.id == id)?;
        let removed = self.bills.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn add_receivable(&mut self, receivable: Receivable) -> Uuid {
        let id = receivable.id;
        self.receivables.push(receivable);
        self.touch();
        id
    }

    pub fn receivable(&self, id: Uuid) -> Option<&Receivable> {
        self.receivables.iter().find(|item| item.id == id)
    }

    pub fn receivable_mut(&mut self, id: Uuid) -> Option<&mut Receivable> {
        self.receivables.iter_mut().find(|item| item.id == id)
    }

    pub fn remove_receivable(&mut self, id: Uuid) -> Option<Receivable> {
        let index = self.receivables.iter().position(|item| item.id == id)?;
        let removed = self.receivables.remove(index);
        self.touch();
        Some(removed)
    }

    // --- budgets ---

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let index = self.budgets.iter().position(|budget| budget.id == id)?;
        let removed = self.budgets.remove(index);
        self.touch();
        Some(removed)
    }

    // --- goals ---

    pub fn add_goal(&mut self, goal: Goal) -> Uuid {
        let id = goal.id;
        self.goals.push(goal);
        self.touch();
        id
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn remove_goal(&mut self, id: Uuid) -> Option<Goal> {
        let index = self.goals.iter().position(|goal| goal.id == id)?;
        let removed = self.goals.remove(index);
        self.touch();
        Some(removed)
    }
}
