use serde::{Deserialize, Serialize};

/// Personal/business partition applied to every entity and query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountScope {
    #[default]
    Personal,
    Business,
}

/// Scopes a category may serve. `Both` categories are visible from either
/// account scope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    Personal,
    Business,
    Both,
}

impl CategoryScope {
    pub fn covers(self, scope: AccountScope) -> bool {
        match self {
            CategoryScope::Both => true,
            CategoryScope::Personal => scope == AccountScope::Personal,
            CategoryScope::Business => scope == AccountScope::Business,
        }
    }
}

impl From<AccountScope> for CategoryScope {
    fn from(scope: AccountScope) -> Self {
        match scope {
            AccountScope::Personal => CategoryScope::Personal,
            AccountScope::Business => CategoryScope::Business,
        }
    }
}

/// Direction of a monetary event. Amounts are always positive; sign comes
/// from the kind, never from a negative amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

/// How a ledger entry was settled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
    Transfer,
    Other,
}
