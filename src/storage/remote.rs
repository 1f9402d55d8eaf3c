//! Adapter over the external persistence API.
//!
//! The API itself is a black box behind [`PersistenceApi`]; this module
//! owns the wire shape (snake_case fields, decimal-string amounts) and is
//! the only place field translation between the wire and the domain model
//! occurs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::{format_cents, parse_decimal_cents};
use crate::domain::{
    AccountScope, Bill, BillStatus, Budget, Category, CategoryScope, CreditCard, EntryKind, Goal,
    InstallmentTag, PaymentMethod, Receivable, ReceivableStatus, Recurrence, Transaction,
};
use crate::errors::{CoreError, Result};
use crate::ledger::calendar::MonthRef;
use crate::ledger::Ledger;

use super::StorageBackend;

/// Transport for the external persistence service. Implementations are
/// expected to return `CoreError::Transient` when the service is
/// unreachable and `CoreError::Authorization` when the session is
/// rejected.
pub trait PersistenceApi: Send + Sync {
    fn fetch(&self) -> Result<Option<SnapshotDto>>;
    fn store(&self, snapshot: &SnapshotDto) -> Result<()>;
}

/// Remote-backed storage: snapshots travel through the wire model.
pub struct RemoteStorage<C: PersistenceApi> {
    client: C,
}

impl<C: PersistenceApi> RemoteStorage<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: PersistenceApi> StorageBackend for RemoteStorage<C> {
    fn load(&self) -> Result<Option<Ledger>> {
        match self.client.fetch()? {
            Some(snapshot) => Ok(Some(snapshot.into_ledger()?)),
            None => Ok(None),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        self.client.store(&SnapshotDto::from_ledger(ledger))
    }
}

// --- wire model ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDto {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
    #[serde(default)]
    pub transactions: Vec<TransactionDto>,
    #[serde(default)]
    pub cards: Vec<CardDto>,
    #[serde(default)]
    pub bills: Vec<BillDto>,
    #[serde(default)]
    pub receivables: Vec<ReceivableDto>,
    #[serde(default)]
    pub budgets: Vec<BudgetDto>,
    #[serde(default)]
    pub goals: Vec<GoalDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub account_scope: CategoryScope,
    pub is_user_defined: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDto {
    pub id: Uuid,
    pub description: String,
    /// Decimal string, e.g. `"149.90"`.
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub account_scope: AccountScope,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDto {
    pub id: Uuid,
    pub name: String,
    pub last_digits: String,
    pub brand: String,
    pub limit: String,
    pub used_limit: String,
    pub due_day: u32,
    pub closing_day: u32,
    pub account_scope: AccountScope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillDto {
    pub id: Uuid,
    pub description: String,
    pub amount: String,
    pub due_date: NaiveDate,
    pub category_id: Uuid,
    pub status: BillStatus,
    pub recurrence: Recurrence,
    pub account_scope: AccountScope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivableDto {
    pub id: Uuid,
    pub description: String,
    pub amount: String,
    pub expected_date: NaiveDate,
    pub category_id: Uuid,
    pub status: ReceivableStatus,
    pub recurrence: Recurrence,
    pub account_scope: AccountScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDto {
    pub id: Uuid,
    pub category_id: Uuid,
    /// `YYYY-MM`.
    pub month: MonthRef,
    pub amount: String,
    pub account_scope: AccountScope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDto {
    pub id: Uuid,
    pub title: String,
    pub target_amount: String,
    pub current_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

fn amount_cents(raw: &str, field: &str) -> Result<i64> {
    parse_decimal_cents(raw)
        .map_err(|err| CoreError::Validation(format!("{field}: {err}")))
}

impl SnapshotDto {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            id: ledger.id,
            name: ledger.name.clone(),
            categories: ledger.categories.iter().map(CategoryDto::from_model).collect(),
            transactions: ledger
                .transactions
                .iter()
                .map(TransactionDto::from_model)
                .collect(),
            cards: ledger.cards.iter().map(CardDto::from_model).collect(),
            bills: ledger.bills.iter().map(BillDto::from_model).collect(),
            receivables: ledger
                .receivables
                .iter()
                .map(ReceivableDto::from_model)
                .collect(),
            budgets: ledger.budgets.iter().map(BudgetDto::from_model).collect(),
            goals: ledger.goals.iter().map(GoalDto::from_model).collect(),
            created_at: ledger.created_at,
            updated_at: ledger.updated_at,
            schema_version: ledger.schema_version,
        }
    }

    pub fn into_ledger(self) -> Result<Ledger> {
        Ok(Ledger {
            id: self.id,
            name: self.name,
            categories: self
                .categories
                .into_iter()
                .map(CategoryDto::into_model)
                .collect(),
            transactions: self
                .transactions
                .into_iter()
                .map(TransactionDto::into_model)
                .collect::<Result<_>>()?,
            cards: self
                .cards
                .into_iter()
                .map(CardDto::into_model)
                .collect::<Result<_>>()?,
            bills: self
                .bills
                .into_iter()
                .map(BillDto::into_model)
                .collect::<Result<_>>()?,
            receivables: self
                .receivables
                .into_iter()
                .map(ReceivableDto::into_model)
                .collect::<Result<_>>()?,
            budgets: self
                .budgets
                .into_iter()
                .map(BudgetDto::into_model)
                .collect::<Result<_>>()?,
            goals: self
                .goals
                .into_iter()
                .map(GoalDto::into_model)
                .collect::<Result<_>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            schema_version: self.schema_version,
        })
    }
}

impl CategoryDto {
    fn from_model(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            kind: category.kind,
            account_scope: category.scope,
            is_user_defined: category.is_custom,
        }
    }

    fn into_model(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            kind: self.kind,
            scope: self.account_scope,
            is_custom: self.is_user_defined,
        }
    }
}

impl TransactionDto {
    fn from_model(txn: &Transaction) -> Self {
        Self {
            id: txn.id,
            description: txn.description.clone(),
            amount: format_cents(txn.amount_cents),
            kind: txn.kind,
            category_id: txn.category_id,
            date: txn.date,
            account_scope: txn.scope,
            payment_method: txn.payment_method,
            card_id: txn.card_id,
            installment_count: txn.installment.map(|tag| tag.count),
            installment_index: txn.installment.map(|tag| tag.index),
            installment_group_id: txn.installment.map(|tag| tag.group_id),
        }
    }

    fn into_model(self) -> Result<Transaction> {
        let installment = match (
            self.installment_group_id,
            self.installment_index,
            self.installment_count,
        ) {
            (Some(group_id), Some(index), Some(count)) => Some(InstallmentTag {
                group_id,
                index,
                count,
            }),
            (None, None, None) => None,
            _ => {
                return Err(CoreError::Validation(format!(
                    "transaction {}: installment fields must be all present or all absent",
                    self.id
                )))
            }
        };
        Ok(Transaction {
            id: self.id,
            description: self.description,
            amount_cents: amount_cents(&self.amount, "amount")?,
            kind: self.kind,
            category_id: self.category_id,
            date: self.date,
            scope: self.account_scope,
            payment_method: self.payment_method,
            card_id: self.card_id,
            installment,
        })
    }
}

impl CardDto {
    fn from_model(card: &CreditCard) -> Self {
        Self {
            id: card.id,
            name: card.name.clone(),
            last_digits: card.last_digits.clone(),
            brand: card.brand.clone(),
            limit: format_cents(card.limit_cents),
            used_limit: format_cents(card.used_cents),
            due_day: card.due_day,
            closing_day: card.closing_day,
            account_scope: card.scope,
        }
    }

    fn into_model(self) -> Result<CreditCard> {
        Ok(CreditCard {
            id: self.id,
            name: self.name,
            last_digits: self.last_digits,
            brand: self.brand,
            limit_cents: amount_cents(&self.limit, "limit")?,
            used_cents: amount_cents(&self.used_limit, "used_limit")?,
            due_day: self.due_day,
            closing_day: self.closing_day,
            scope: self.account_scope,
        })
    }
}

impl BillDto {
    fn from_model(bill: &Bill) -> Self {
        Self {
            id: bill.id,
            description: bill.description.clone(),
            amount: format_cents(bill.amount_cents),
            due_date: bill.due_date,
            category_id: bill.category_id,
            status: bill.status,
            recurrence: bill.recurrence,
            account_scope: bill.scope,
        }
    }

    fn into_model(self) -> Result<Bill> {
        Ok(Bill {
            id: self.id,
            description: self.description,
            amount_cents: amount_cents(&self.amount, "amount")?,
            due_date: self.due_date,
            category_id: self.category_id,
            status: self.status,
            recurrence: self.recurrence,
            scope: self.account_scope,
        })
    }
}

impl ReceivableDto {
    fn from_model(receivable: &Receivable) -> Self {
        Self {
            id: receivable.id,
            description: receivable.description.clone(),
            amount: format_cents(receivable.amount_cents),
            expected_date: receivable.expected_date,
            category_id: receivable.category_id,
            status: receivable.status,
            recurrence: receivable.recurrence,
            account_scope: receivable.scope,
            payer: receivable.payer.clone(),
        }
    }

    fn into_model(self) -> Result<Receivable> {
        Ok(Receivable {
            id: self.id,
            description: self.description,
            amount_cents: amount_cents(&self.amount, "amount")?,
            expected_date: self.expected_date,
            category_id: self.category_id,
            status: self.status,
            recurrence: self.recurrence,
            scope: self.account_scope,
            payer: self.payer,
        })
    }
}

impl BudgetDto {
    fn from_model(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            category_id: budget.category_id,
            month: budget.month,
            amount: format_cents(budget.limit_cents),
            account_scope: budget.scope,
        }
    }

    fn into_model(self) -> Result<Budget> {
        Ok(Budget {
            id: self.id,
            category_id: self.category_id,
            month: self.month,
            limit_cents: amount_cents(&self.amount, "amount")?,
            scope: self.account_scope,
        })
    }
}

impl GoalDto {
    fn from_model(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            target_amount: format_cents(goal.target_cents),
            current_amount: format_cents(goal.current_cents),
            deadline: goal.deadline,
            completed: goal.completed,
            completed_at: goal.completed_at,
        }
    }

    fn into_model(self) -> Result<Goal> {
        Ok(Goal {
            id: self.id,
            title: self.title,
            target_cents: amount_cents(&self.target_amount, "target_amount")?,
            current_cents: amount_cents(&self.current_amount, "current_amount")?,
            deadline: self.deadline,
            completed: self.completed,
            completed_at: self.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[test]
    fn snapshot_round_trips_through_the_wire_model() {
        let mut ledger = Ledger::new("wire");
        let category_id = ledger.add_category(Category::new(
            "Gadgets",
            EntryKind::Expense,
            CategoryScope::Personal,
        ));
        ledger.add_transaction(
            Transaction::new(
                "Keyboard",
                14_990,
                EntryKind::Expense,
                category_id,
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                AccountScope::Personal,
                PaymentMethod::Cash,
            ),
        );
        let snapshot = SnapshotDto::from_ledger(&ledger);
        assert_eq!(snapshot.transactions[0].amount, "149.90");
        let restored = snapshot.into_ledger().unwrap();
        assert_eq!(restored.transactions[0].amount_cents, 14_990);
        assert_eq!(restored.id, ledger.id);
    }

    #[test]
    fn wire_field_names_are_snake_case() {
        let mut ledger = Ledger::new("wire");
        ledger.add_bill(Bill::new(
            "Hosting",
            2_900,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ledger.categories[0].id,
            Recurrence::Monthly,
            AccountScope::Personal,
        ));
        let snapshot = SnapshotDto::from_ledger(&ledger);
        let json = serde_json::to_value(&snapshot).unwrap();
        let bill = &json["bills"][0];
        assert!(bill.get("due_date").is_some());
        assert!(bill.get("category_id").is_some());
        assert!(bill.get("account_scope").is_some());
        let category = &json["categories"][0];
        assert!(category.get("is_user_defined").is_some());
        assert!(category.get("type").is_some());
    }

    #[test]
    fn partial_installment_fields_are_rejected() {
        let ledger = Ledger::new("wire");
        let mut snapshot = SnapshotDto::from_ledger(&ledger);
        snapshot.transactions.push(TransactionDto {
            id: Uuid::new_v4(),
            description: "broken".into(),
            amount: "10.00".into(),
            kind: EntryKind::Expense,
            category_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            account_scope: AccountScope::Personal,
            payment_method: PaymentMethod::CreditCard,
            card_id: None,
            installment_count: Some(3),
            installment_index: None,
            installment_group_id: None,
        });
        let err = snapshot
            .into_ledger()
            .expect_err("partial tagging must be rejected");
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn malformed_wire_amount_is_rejected() {
        let ledger = Ledger::new("wire");
        let mut snapshot = SnapshotDto::from_ledger(&ledger);
        snapshot.goals.push(GoalDto {
            id: Uuid::new_v4(),
            title: "broken".into(),
            target_amount: "lots".into(),
            current_amount: "0.00".into(),
            deadline: None,
            completed: false,
            completed_at: None,
        });
        assert!(snapshot.into_ledger().is_err());
    }

    struct FlakyApi {
        reachable: Mutex<bool>,
    }

    impl PersistenceApi for FlakyApi {
        fn fetch(&self) -> Result<Option<SnapshotDto>> {
            Ok(None)
        }

        fn store(&self, _snapshot: &SnapshotDto) -> Result<()> {
            if *self.reachable.lock().unwrap() {
                Ok(())
            } else {
                Err(CoreError::Transient("connection refused".into()))
            }
        }
    }

    #[test]
    fn transport_errors_pass_through_untouched() {
        let storage = RemoteStorage::new(FlakyApi {
            reachable: Mutex::new(false),
        });
        let err = storage
            .save(&Ledger::new("remote"))
            .expect_err("unreachable api must surface");
        assert!(err.is_retryable());
    }
}
