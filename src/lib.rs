//! Ledger and cyclical-obligation engine for personal and small-business
//! finances: a validated transaction store with installment splitting,
//! rolling credit-card invoices, category budgets, savings goals, and
//! due-date scheduling for bills and receivables, all derived from one
//! in-memory snapshot behind a pluggable storage backend.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;

pub use self::core::engine::LedgerManager;
pub use self::core::time::{Clock, FixedClock, SystemClock};
pub use errors::{CoreError, Result};
pub use ledger::Ledger;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        crate::core::utils::init_tracing();
        tracing::info!("ledger core tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
