//! Category administration on top of the built-in set.

use uuid::Uuid;

use crate::domain::{AccountScope, Category, EntryKind};
use crate::errors::{CoreError, Result};
use crate::ledger::Ledger;

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, category: Category) -> Result<Uuid> {
        Self::validate_name(ledger, &category.name)?;
        Ok(ledger.add_category(category))
    }

    /// Only user-defined categories can be removed, and only while no
    /// transaction, obligation, or budget references them.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<()> {
        let category = ledger
            .category(id)
            .ok_or(CoreError::CategoryNotFound(id))?;
        if !category.is_custom {
            return Err(CoreError::InvalidOperation(
                "built-in categories cannot be removed".into(),
            ));
        }
        if ledger.category_is_referenced(id) {
            return Err(CoreError::InvalidOperation(
                "category is still referenced".into(),
            ));
        }
        ledger.categories.retain(|category| category.id != id);
        ledger.touch();
        Ok(())
    }

    /// Categories visible from the scope, optionally narrowed by kind.
    pub fn list(
        ledger: &Ledger,
        scope: AccountScope,
        kind: Option<EntryKind>,
    ) -> Vec<&Category> {
        ledger
            .categories
            .iter()
            .filter(|category| category.scope.covers(scope))
            .filter(|category| kind.map_or(true, |kind| category.kind == kind))
            .collect()
    }

    fn validate_name(ledger: &Ledger, candidate: &str) -> Result<()> {
        if candidate.trim().is_empty() {
            return Err(CoreError::Validation("category name is required".into()));
        }
        let normalized = candidate.trim().to_ascii_lowercase();
        if ledger
            .categories
            .iter()
            .any(|category| category.name.trim().to_ascii_lowercase() == normalized)
        {
            return Err(CoreError::Validation(format!(
                "category `{candidate}` already exists"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryScope, PaymentMethod, Transaction};
    use chrono::NaiveDate;

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let mut ledger = Ledger::new("categories");
        CategoryService::add(
            &mut ledger,
            Category::new("Pets", EntryKind::Expense, CategoryScope::Personal),
        )
        .unwrap();
        let err = CategoryService::add(
            &mut ledger,
            Category::new("  pets ", EntryKind::Expense, CategoryScope::Personal),
        )
        .expect_err("duplicate name must be rejected");
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn builtin_categories_cannot_be_removed() {
        let mut ledger = Ledger::new("categories");
        let builtin_id = ledger.categories[0].id;
        let err = CategoryService::remove(&mut ledger, builtin_id)
            .expect_err("built-in removal must fail");
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }

    #[test]
    fn referenced_custom_category_cannot_be_removed() {
        let mut ledger = Ledger::new("categories");
        let id = CategoryService::add(
            &mut ledger,
            Category::new("Pets", EntryKind::Expense, CategoryScope::Personal),
        )
        .unwrap();
        ledger.add_transaction(Transaction::new(
            "Vet",
            5_000,
            EntryKind::Expense,
            id,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            AccountScope::Personal,
            PaymentMethod::Cash,
        ));
        assert!(CategoryService::remove(&mut ledger, id).is_err());
        ledger.transactions.clear();
        assert!(CategoryService::remove(&mut ledger, id).is_ok());
        assert!(ledger.category(id).is_none());
    }

    #[test]
    fn list_applies_scope_partition() {
        let mut ledger = Ledger::new("categories");
        let personal = CategoryService::add(
            &mut ledger,
            Category::new("Hobbies", EntryKind::Expense, CategoryScope::Personal),
        )
        .unwrap();
        let both = CategoryService::add(
            &mut ledger,
            Category::new("Software", EntryKind::Expense, CategoryScope::Both),
        )
        .unwrap();
        let business: Vec<Uuid> = CategoryService::list(&ledger, AccountScope::Business, None)
            .iter()
            .map(|category| category.id)
            .collect();
        assert!(business.contains(&both));
        assert!(!business.contains(&personal));
    }
}
