//! The engine facade: one ledger, one storage capability, one clock,
//! all chosen at construction.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{
    BudgetService, CategoryService, GoalService, InstallmentService, InvoiceService,
    ObligationService, PeriodComparison, PeriodFilter, PurchaseRequest, Settlement,
    SummaryService, TransactionService,
};
use crate::core::time::Clock;
use crate::domain::{
    AccountScope, Bill, BudgetUsage, CardInvoice, Category, CreditCard, DueStatus, Goal,
    Receivable, Transaction, TransactionFilter, TransactionPatch,
};
use crate::errors::{CoreError, Result};
use crate::ledger::calendar::MonthRef;
use crate::ledger::Ledger;
use crate::storage::StorageBackend;

const DEFAULT_LEDGER_NAME: &str = "primary";

/// Coordinates the in-memory ledger with its persistence backend.
///
/// Every mutation validates, applies locally, then flushes the snapshot.
/// A transient flush failure keeps the local mutation, marks the manager
/// dirty, and surfaces the error so the caller can decide; `reconcile`
/// retries the flush. Validation and authorization failures propagate
/// before anything is applied.
pub struct LedgerManager {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    dirty: bool,
}

impl LedgerManager {
    /// Loads the persisted snapshot, or starts a fresh ledger when the
    /// backend holds none.
    pub fn new(storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Result<Self> {
        let ledger = match storage.load()? {
            Some(ledger) => ledger,
            None => Ledger::new(DEFAULT_LEDGER_NAME),
        };
        Ok(Self {
            ledger,
            storage,
            clock,
            dirty: false,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Whether local state is ahead of the persistence backend.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Retries a deferred flush. Returns whether a flush was needed.
    pub fn reconcile(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.storage.save(&self.ledger)?;
        self.dirty = false;
        tracing::info!("deferred snapshot flushed");
        Ok(true)
    }

    fn commit(&mut self) -> Result<()> {
        match self.storage.save(&self.ledger) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                if err.is_retryable() {
                    self.dirty = true;
                    tracing::warn!(error = %err, "snapshot flush deferred, local state kept");
                } else {
                    tracing::error!(error = %err, "snapshot flush failed");
                }
                Err(err)
            }
        }
    }

    // --- transactions ---

    pub fn record_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        let id = TransactionService::add(&mut self.ledger, transaction)?;
        self.commit()?;
        Ok(id)
    }

    pub fn update_transaction(&mut self, id: Uuid, patch: TransactionPatch) -> Result<()> {
        TransactionService::update(&mut self.ledger, id, patch)?;
        self.commit()
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let removed = TransactionService::remove(&mut self.ledger, id)?;
        self.commit()?;
        Ok(removed)
    }

    pub fn transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        TransactionService::list(&self.ledger, filter)
    }

    /// Records a credit-card purchase, split into installments when
    /// `request.installments > 1`.
    pub fn record_purchase(&mut self, request: PurchaseRequest) -> Result<Vec<Uuid>> {
        let ids = InstallmentService::record_purchase(&mut self.ledger, request)?;
        self.commit()?;
        Ok(ids)
    }

    // --- categories ---

    pub fn add_category(&mut self, category: Category) -> Result<Uuid> {
        let id = CategoryService::add(&mut self.ledger, category)?;
        self.commit()?;
        Ok(id)
    }

    pub fn remove_category(&mut self, id: Uuid) -> Result<()> {
        CategoryService::remove(&mut self.ledger, id)?;
        self.commit()
    }

    pub fn categories(&self, scope: AccountScope) -> Vec<&Category> {
        CategoryService::list(&self.ledger, scope, None)
    }

    // --- cards ---

    pub fn add_card(&mut self, card: CreditCard) -> Result<Uuid> {
        Self::validate_card(&card)?;
        let id = self.ledger.add_card(card);
        self.commit()?;
        Ok(id)
    }

    pub fn invoices(&self, scope: AccountScope, card_id: Uuid) -> Result<Vec<CardInvoice>> {
        InvoiceService::recent_invoices(&self.ledger, scope, card_id, self.clock.today())
    }

    fn validate_card(card: &CreditCard) -> Result<()> {
        if card.limit_cents <= 0 {
            return Err(CoreError::Validation("card limit must be positive".into()));
        }
        if !(1..=31).contains(&card.due_day) || !(1..=31).contains(&card.closing_day) {
            return Err(CoreError::Validation(
                "due and closing days must be within 1..=31".into(),
            ));
        }
        Ok(())
    }

    // --- bills and receivables ---

    pub fn add_bill(&mut self, bill: Bill) -> Result<Uuid> {
        let id = ObligationService::add_bill(&mut self.ledger, bill)?;
        self.commit()?;
        Ok(id)
    }

    pub fn add_receivable(&mut self, receivable: Receivable) -> Result<Uuid> {
        let id = ObligationService::add_receivable(&mut self.ledger, receivable)?;
        self.commit()?;
        Ok(id)
    }

    pub fn settle_bill(&mut self, bill_id: Uuid) -> Result<Settlement> {
        let settlement =
            ObligationService::mark_paid(&mut self.ledger, bill_id, self.clock.as_ref())?;
        self.commit()?;
        Ok(settlement)
    }

    pub fn settle_receivable(&mut self, receivable_id: Uuid) -> Result<Settlement> {
        let settlement =
            ObligationService::mark_received(&mut self.ledger, receivable_id, self.clock.as_ref())?;
        self.commit()?;
        Ok(settlement)
    }

    pub fn bill_schedule(&self, scope: AccountScope) -> Vec<(&Bill, DueStatus)> {
        ObligationService::pending_bills(&self.ledger, scope, self.clock.today())
    }

    pub fn receivable_schedule(&self, scope: AccountScope) -> Vec<(&Receivable, DueStatus)> {
        ObligationService::pending_receivables(&self.ledger, scope, self.clock.today())
    }

    /// Flips past-due pending obligations to overdue and persists when
    /// anything changed.
    pub fn refresh_due_statuses(&mut self) -> Result<usize> {
        let flipped = ObligationService::refresh_statuses(&mut self.ledger, self.clock.today());
        if flipped > 0 {
            self.commit()?;
        }
        Ok(flipped)
    }

    // --- budgets ---

    pub fn upsert_budget(
        &mut self,
        category_id: Uuid,
        month: MonthRef,
        scope: AccountScope,
        limit_cents: i64,
    ) -> Result<Uuid> {
        let id = BudgetService::upsert(&mut self.ledger, category_id, month, scope, limit_cents)?;
        self.commit()?;
        Ok(id)
    }

    pub fn copy_previous_budgets(&mut self, month: MonthRef, scope: AccountScope) -> Result<usize> {
        let copied = BudgetService::copy_previous(&mut self.ledger, month, scope);
        if copied > 0 {
            self.commit()?;
        }
        Ok(copied)
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Result<()> {
        BudgetService::remove(&mut self.ledger, id)?;
        self.commit()
    }

    pub fn budget_usages(&self, month: MonthRef, scope: AccountScope) -> Vec<BudgetUsage> {
        BudgetService::usages(&self.ledger, month, scope)
    }

    // --- goals ---

    pub fn create_goal(
        &mut self,
        title: impl Into<String>,
        target_cents: i64,
        deadline: Option<NaiveDate>,
    ) -> Result<Uuid> {
        let id = GoalService::create(&mut self.ledger, title, target_cents, deadline)?;
        self.commit()?;
        Ok(id)
    }

    pub fn deposit_to_goal(&mut self, goal_id: Uuid, amount_cents: i64) -> Result<()> {
        GoalService::deposit(&mut self.ledger, goal_id, amount_cents, self.clock.as_ref())?;
        self.commit()
    }

    pub fn complete_goal(&mut self, goal_id: Uuid) -> Result<()> {
        GoalService::mark_complete(&mut self.ledger, goal_id, self.clock.as_ref())?;
        self.commit()
    }

    pub fn remove_goal(&mut self, goal_id: Uuid) -> Result<Goal> {
        let removed = GoalService::remove(&mut self.ledger, goal_id)?;
        self.commit()?;
        Ok(removed)
    }

    // --- aggregates ---

    pub fn summary(&self, scope: AccountScope, filter: PeriodFilter) -> PeriodComparison {
        SummaryService::compare(&self.ledger, scope, filter, self.clock.today())
    }
}
