use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{AccountScope, EntryKind, PaymentMethod};
use crate::ledger::calendar::DateWindow;

/// One dated monetary event in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    /// Always positive; direction comes from `kind`.
    pub amount_cents: i64,
    pub kind: EntryKind,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub scope: AccountScope,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<InstallmentTag>,
}

/// Links an entry to the purchase it was split from. Tagging is
/// all-or-nothing: a standalone purchase carries no tag at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallmentTag {
    pub group_id: Uuid,
    /// 1-based position within the group.
    pub index: u32,
    pub count: u32,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        description: impl Into<String>,
        amount_cents: i64,
        kind: EntryKind,
        category_id: Uuid,
        date: NaiveDate,
        scope: AccountScope,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount_cents,
            kind,
            category_id,
            date,
            scope,
            payment_method,
            card_id: None,
            installment: None,
        }
    }

    pub fn with_card(mut self, card_id: Uuid) -> Self {
        self.card_id = Some(card_id);
        self
    }

    pub fn with_installment(mut self, tag: InstallmentTag) -> Self {
        self.installment = Some(tag);
        self
    }

    /// Whether this entry belongs to the given card's invoice stream.
    pub fn is_card_expense(&self, card_id: Uuid) -> bool {
        self.card_id == Some(card_id)
            && self.kind == EntryKind::Expense
            && self.payment_method == PaymentMethod::CreditCard
    }
}

/// Partial update applied through the store's `update` contract. Card and
/// installment links are fixed at creation and cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub kind: Option<EntryKind>,
    pub category_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub scope: Option<AccountScope>,
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionPatch {
    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(description) = &self.description {
            txn.description = description.clone();
        }
        if let Some(amount_cents) = self.amount_cents {
            txn.amount_cents = amount_cents;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(category_id) = self.category_id {
            txn.category_id = category_id;
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(scope) = self.scope {
            txn.scope = scope;
        }
        if let Some(payment_method) = self.payment_method {
            txn.payment_method = payment_method;
        }
    }
}

/// Query over the transaction list. The account scope is mandatory; every
/// read is partitioned by it.
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub scope: AccountScope,
    pub kind: Option<EntryKind>,
    pub category_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub window: Option<DateWindow>,
}

impl TransactionFilter {
    pub fn scoped(scope: AccountScope) -> Self {
        Self {
            scope,
            kind: None,
            category_id: None,
            card_id: None,
            window: None,
        }
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        txn.scope == self.scope
            && self.kind.map_or(true, |kind| txn.kind == kind)
            && self.category_id.map_or(true, |id| txn.category_id == id)
            && self.card_id.map_or(true, |id| txn.card_id == Some(id))
            && self
                .window
                .as_ref()
                .map_or(true, |window| window.contains(txn.date))
    }
}
