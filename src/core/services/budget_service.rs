//! Monthly category budgets and their derived usage.

use uuid::Uuid;

use crate::domain::{AccountScope, Budget, BudgetUsage, EntryKind};
use crate::errors::{CoreError, Result};
use crate::ledger::calendar::MonthRef;
use crate::ledger::Ledger;

pub struct BudgetService;

impl BudgetService {
    /// Creates or replaces the single budget row for
    /// `(category, month, scope)` and returns its id.
    pub fn upsert(
        ledger: &mut Ledger,
        category_id: Uuid,
        month: MonthRef,
        scope: AccountScope,
        limit_cents: i64,
    ) -> Result<Uuid> {
        if limit_cents <= 0 {
            return Err(CoreError::Validation("budget limit must be positive".into()));
        }
        let category = ledger.category(category_id).ok_or_else(|| {
            CoreError::Validation(format!("unknown category {category_id}"))
        })?;
        if category.kind != EntryKind::Expense {
            return Err(CoreError::Validation(format!(
                "budgets apply to expense categories, `{}` is income",
                category.name
            )));
        }
        if !category.scope.covers(scope) {
            return Err(CoreError::Validation(format!(
                "category `{}` is not available in {:?} scope",
                category.name, scope
            )));
        }
        if let Some(existing) = ledger
            .budgets
            .iter_mut()
            .find(|budget| budget.key_matches(category_id, month, scope))
        {
            existing.limit_cents = limit_cents;
            let id = existing.id;
            ledger.touch();
            tracing::debug!(%id, %month, "budget limit replaced");
            return Ok(id);
        }
        let id = ledger.add_budget(Budget::new(category_id, month, limit_cents, scope));
        tracing::debug!(%id, %month, "budget created");
        Ok(id)
    }

    /// Pairs a budget row with its spend, derived by summing matching
    /// expense entries. Never cached.
    pub fn usage(ledger: &Ledger, budget: &Budget) -> BudgetUsage {
        let spent_cents = ledger
            .transactions_in(budget.scope)
            .filter(|txn| {
                txn.kind == EntryKind::Expense
                    && txn.category_id == budget.category_id
                    && budget.month.contains(txn.date)
            })
            .map(|txn| txn.amount_cents)
            .sum();
        BudgetUsage::from_parts(budget, spent_cents)
    }

    pub fn usages(ledger: &Ledger, month: MonthRef, scope: AccountScope) -> Vec<BudgetUsage> {
        ledger
            .budgets
            .iter()
            .filter(|budget| budget.month == month && budget.scope == scope)
            .map(|budget| Self::usage(ledger, budget))
            .collect()
    }

    /// Duplicates every budget row from the prior calendar month into
    /// `month`, skipping categories that already have a row there.
    /// Calling it twice changes nothing the second time.
    pub fn copy_previous(ledger: &mut Ledger, month: MonthRef, scope: AccountScope) -> usize {
        let source = month.prev();
        let missing: Vec<(Uuid, i64)> = ledger
            .budgets
            .iter()
            .filter(|budget| budget.month == source && budget.scope == scope)
            .filter(|budget| {
                !ledger
                    .budgets
                    .iter()
                    .any(|existing| existing.key_matches(budget.category_id, month, scope))
            })
            .map(|budget| (budget.category_id, budget.limit_cents))
            .collect();
        let copied = missing.len();
        for (category_id, limit_cents) in missing {
            ledger.add_budget(Budget::new(category_id, month, limit_cents, scope));
        }
        if copied > 0 {
            tracing::info!(copied, %month, "budgets carried over from prior month");
        }
        copied
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<Budget> {
        ledger.remove_budget(id).ok_or(CoreError::BudgetNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryScope, PaymentMethod, Transaction};
    use chrono::NaiveDate;

    fn seeded() -> (Ledger, Uuid) {
        let mut ledger = Ledger::new("budgets");
        let category_id = ledger.add_category(Category::new(
            "Dining",
            EntryKind::Expense,
            CategoryScope::Personal,
        ));
        (ledger, category_id)
    }

    fn expense(category_id: Uuid, cents: i64, on: NaiveDate) -> Transaction {
        Transaction::new(
            "meal",
            cents,
            EntryKind::Expense,
            category_id,
            on,
            AccountScope::Personal,
            PaymentMethod::Cash,
        )
    }

    #[test]
    fn upsert_replaces_instead_of_duplicating() {
        let (mut ledger, category_id) = seeded();
        let month = MonthRef::new(2024, 5);
        let first = BudgetService::upsert(
            &mut ledger,
            category_id,
            month,
            AccountScope::Personal,
            50_000,
        )
        .unwrap();
        let second = BudgetService::upsert(
            &mut ledger,
            category_id,
            month,
            AccountScope::Personal,
            80_000,
        )
        .unwrap();
        assert_eq!(first, second);
        assert_eq!(ledger.budgets.len(), 1);
        assert_eq!(ledger.budgets[0].limit_cents, 80_000);
    }

    #[test]
    fn rejects_income_category_and_bad_limit() {
        let (mut ledger, _) = seeded();
        let income_id = ledger.add_category(Category::new(
            "Salary extra",
            EntryKind::Income,
            CategoryScope::Personal,
        ));
        let month = MonthRef::new(2024, 5);
        assert!(BudgetService::upsert(
            &mut ledger,
            income_id,
            month,
            AccountScope::Personal,
            10_000
        )
        .is_err());
        let (mut ledger, category_id) = seeded();
        assert!(BudgetService::upsert(
            &mut ledger,
            category_id,
            month,
            AccountScope::Personal,
            0
        )
        .is_err());
    }

    #[test]
    fn usage_sums_only_matching_month_and_scope() {
        let (mut ledger, category_id) = seeded();
        let month = MonthRef::new(2024, 5);
        let budget_id = BudgetService::upsert(
            &mut ledger,
            category_id,
            month,
            AccountScope::Personal,
            10_000,
        )
        .unwrap();
        ledger.add_transaction(expense(
            category_id,
            6_000,
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        ));
        ledger.add_transaction(expense(
            category_id,
            9_000,
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
        ));
        let budget = ledger.budget(budget_id).unwrap().clone();
        let usage = BudgetService::usage(&ledger, &budget);
        assert_eq!(usage.spent_cents, 6_000);
        assert_eq!(usage.percent_used, 60.0);
    }

    #[test]
    fn copy_previous_is_idempotent() {
        let (mut ledger, category_id) = seeded();
        let other = ledger.add_category(Category::new(
            "Fuel",
            EntryKind::Expense,
            CategoryScope::Personal,
        ));
        let april = MonthRef::new(2024, 4);
        let may = MonthRef::new(2024, 5);
        BudgetService::upsert(&mut ledger, category_id, april, AccountScope::Personal, 40_000)
            .unwrap();
        BudgetService::upsert(&mut ledger, other, april, AccountScope::Personal, 20_000)
            .unwrap();
        // one category already budgeted in the target month
        BudgetService::upsert(&mut ledger, category_id, may, AccountScope::Personal, 45_000)
            .unwrap();

        let copied = BudgetService::copy_previous(&mut ledger, may, AccountScope::Personal);
        assert_eq!(copied, 1);
        let copied_again = BudgetService::copy_previous(&mut ledger, may, AccountScope::Personal);
        assert_eq!(copied_again, 0);

        let may_rows: Vec<_> = ledger
            .budgets
            .iter()
            .filter(|budget| budget.month == may)
            .collect();
        assert_eq!(may_rows.len(), 2);
        let kept = may_rows
            .iter()
            .find(|budget| budget.category_id == category_id)
            .unwrap();
        assert_eq!(kept.limit_cents, 45_000);
    }
}
