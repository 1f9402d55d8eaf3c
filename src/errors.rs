use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the ledger engine and its storage backends.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Rejected before any state mutation. Nothing was applied.
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transaction not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
    #[error("Bill not found: {0}")]
    BillNotFound(Uuid),
    #[error("Receivable not found: {0}")]
    ReceivableNotFound(Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// Persistence temporarily unreachable. Local state may be ahead of the
    /// store; retry via `LedgerManager::reconcile`.
    #[error("Persistence unreachable: {0}")]
    Transient(String),
    /// Fatal. Never retried.
    #[error("Not authorized: {0}")]
    Authorization(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Whether the caller may retry the failed operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transient(_))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub type Result<T> = StdResult<T, CoreError>;
