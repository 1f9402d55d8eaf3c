//! Pure data model of the engine. Everything here is serde-enabled and
//! free of storage or clock concerns.

pub mod budget;
pub mod card;
pub mod category;
pub mod common;
pub mod goal;
pub mod money;
pub mod obligation;
pub mod transaction;

pub use budget::{Budget, BudgetHealth, BudgetUsage};
pub use card::{CardInvoice, CreditCard, InvoiceStatus};
pub use category::Category;
pub use common::{AccountScope, CategoryScope, EntryKind, PaymentMethod};
pub use goal::Goal;
pub use obligation::{
    Bill, BillStatus, DueStatus, Obligation, Receivable, ReceivableStatus, Recurrence,
};
pub use transaction::{InstallmentTag, Transaction, TransactionFilter, TransactionPatch};
