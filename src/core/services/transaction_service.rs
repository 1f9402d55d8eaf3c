//! The ledger store contract: validated CRUD over transactions.

use uuid::Uuid;

use crate::domain::{
    EntryKind, PaymentMethod, Transaction, TransactionFilter, TransactionPatch,
};
use crate::errors::{CoreError, Result};
use crate::ledger::Ledger;

pub struct TransactionService;

impl TransactionService {
    /// Validates and inserts a new entry, returning its identifier.
    ///
    /// A standalone credit-card expense bumps the owning card's used
    /// limit; entries carrying an installment tag do not, because the
    /// group's single bump happens when the purchase is recorded.
    pub fn add(ledger: &mut Ledger, transaction: Transaction) -> Result<Uuid> {
        Self::validate(ledger, &transaction)?;
        let standalone_card_expense = transaction.installment.is_none()
            && transaction.kind == EntryKind::Expense
            && transaction.payment_method == PaymentMethod::CreditCard;
        if standalone_card_expense {
            if let Some(card_id) = transaction.card_id {
                if let Some(card) = ledger.card_mut(card_id) {
                    card.register_charge(transaction.amount_cents);
                }
            }
        }
        let id = ledger.add_transaction(transaction);
        tracing::debug!(%id, "transaction recorded");
        Ok(id)
    }

    /// Merges the patch, re-validates the merged entry, and applies it
    /// atomically: an invalid patch leaves the stored entry untouched.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: TransactionPatch) -> Result<()> {
        let current = ledger
            .transaction(id)
            .ok_or(CoreError::EntryNotFound(id))?;
        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        Self::validate(ledger, &updated)?;
        if let Some(slot) = ledger.transaction_mut(id) {
            *slot = updated;
        }
        ledger.touch();
        Ok(())
    }

    /// Removes exactly one entry. An installment group member leaves its
    /// siblings in place; the group is not re-balanced.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<Transaction> {
        ledger
            .remove_transaction(id)
            .ok_or(CoreError::EntryNotFound(id))
    }

    pub fn list<'a>(ledger: &'a Ledger, filter: &TransactionFilter) -> Vec<&'a Transaction> {
        ledger
            .transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect()
    }

    pub(crate) fn validate(ledger: &Ledger, transaction: &Transaction) -> Result<()> {
        if transaction.amount_cents <= 0 {
            return Err(CoreError::Validation(
                "amount must be positive".into(),
            ));
        }
        if transaction.description.trim().is_empty() {
            return Err(CoreError::Validation("description is required".into()));
        }
        let category = ledger.category(transaction.category_id).ok_or_else(|| {
            CoreError::Validation(format!("unknown category {}", transaction.category_id))
        })?;
        if category.kind != transaction.kind {
            return Err(CoreError::Validation(format!(
                "category `{}` does not accept {:?} entries",
                category.name, transaction.kind
            )));
        }
        if !category.scope.covers(transaction.scope) {
            return Err(CoreError::Validation(format!(
                "category `{}` is not available in {:?} scope",
                category.name, transaction.scope
            )));
        }
        if let Some(tag) = &transaction.installment {
            if tag.count < 1 {
                return Err(CoreError::Validation(
                    "installment count must be at least 1".into(),
                ));
            }
            if tag.index < 1 || tag.index > tag.count {
                return Err(CoreError::Validation(format!(
                    "installment index {} outside 1..={}",
                    tag.index, tag.count
                )));
            }
            if transaction.payment_method != PaymentMethod::CreditCard {
                return Err(CoreError::Validation(
                    "installment entries must be paid by credit card".into(),
                ));
            }
        }
        if transaction.payment_method == PaymentMethod::CreditCard
            && transaction.card_id.is_none()
        {
            return Err(CoreError::Validation(
                "credit card entries must reference a card".into(),
            ));
        }
        if let Some(card_id) = transaction.card_id {
            let card = ledger.card(card_id).ok_or_else(|| {
                CoreError::Validation(format!("unknown card {card_id}"))
            })?;
            if card.scope != transaction.scope {
                return Err(CoreError::Validation(format!(
                    "card `{}` belongs to {:?} scope",
                    card.name, card.scope
                )));
            }
        }
        Ok(())
    }
}
