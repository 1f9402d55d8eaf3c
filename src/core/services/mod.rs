//! Stateless services over the canonical ledger. Each one is a pure read
//! or a validated write-back; none holds state of its own.

pub mod budget_service;
pub mod category_service;
pub mod goal_service;
pub mod installment_service;
pub mod invoice_service;
pub mod obligation_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use goal_service::GoalService;
pub use installment_service::{InstallmentService, PurchaseRequest};
pub use invoice_service::InvoiceService;
pub use obligation_service::{ObligationService, Settlement};
pub use summary_service::{
    CategorySpend, PeriodComparison, PeriodFilter, PeriodSummary, SummaryService,
};
pub use transaction_service::TransactionService;
