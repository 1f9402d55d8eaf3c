use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::AccountScope;
use crate::ledger::calendar::MonthRef;

/// A monthly spending guardrail for one category within one account scope.
/// Unique per `(category, month, scope)`; writes go through upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: MonthRef,
    pub limit_cents: i64,
    pub scope: AccountScope,
}

impl Budget {
    pub fn new(
        category_id: Uuid,
        month: MonthRef,
        limit_cents: i64,
        scope: AccountScope,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            month,
            limit_cents,
            scope,
        }
    }

    pub fn key_matches(&self, category_id: Uuid, month: MonthRef, scope: AccountScope) -> bool {
        self.category_id == category_id && self.month == month && self.scope == scope
    }
}

/// Usage severity against the configured limit.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    Under,
    Near,
    Over,
}

impl BudgetHealth {
    pub fn classify(percent_used: f64) -> Self {
        if percent_used < 80.0 {
            BudgetHealth::Under
        } else if percent_used < 100.0 {
            BudgetHealth::Near
        } else {
            BudgetHealth::Over
        }
    }
}

/// A budget row paired with its derived spend, computed at read time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetUsage {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub month: MonthRef,
    pub scope: AccountScope,
    pub limit_cents: i64,
    pub spent_cents: i64,
    /// Raw ratio; values above 100 stay unclamped so alerting sees them.
    pub percent_used: f64,
    pub health: BudgetHealth,
}

impl BudgetUsage {
    pub fn from_parts(budget: &Budget, spent_cents: i64) -> Self {
        let percent_used = if budget.limit_cents > 0 {
            spent_cents as f64 / budget.limit_cents as f64 * 100.0
        } else if spent_cents > 0 {
            100.0
        } else {
            0.0
        };
        Self {
            budget_id: budget.id,
            category_id: budget.category_id,
            month: budget.month,
            scope: budget.scope,
            limit_cents: budget.limit_cents,
            spent_cents,
            percent_used,
            health: BudgetHealth::classify(percent_used),
        }
    }
}
