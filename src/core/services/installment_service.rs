//! Expands one credit-card purchase into dated installment entries.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::money::split_even;
use crate::domain::{
    AccountScope, EntryKind, InstallmentTag, PaymentMethod, Transaction,
};
use crate::errors::{CoreError, Result};
use crate::ledger::calendar::shift_months;
use crate::ledger::Ledger;

use super::transaction_service::TransactionService;

/// A credit-card purchase to be recorded, possibly in installments.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub scope: AccountScope,
    pub card_id: Uuid,
    pub installments: u32,
}

pub struct InstallmentService;

impl InstallmentService {
    /// The dated amounts a purchase splits into: one calendar month apart
    /// (day clamped), remainder cents on the first part.
    pub fn plan(amount_cents: i64, date: NaiveDate, installments: u32) -> Vec<(NaiveDate, i64)> {
        split_even(amount_cents, installments)
            .into_iter()
            .enumerate()
            .map(|(i, part)| (shift_months(date, i as i32), part))
            .collect()
    }

    /// Validates the whole plan up front, then inserts every entry and
    /// bumps the card's used limit once by the original total. Nothing is
    /// applied when any part of the plan fails validation.
    pub fn record_purchase(ledger: &mut Ledger, request: PurchaseRequest) -> Result<Vec<Uuid>> {
        if request.installments == 0 {
            return Err(CoreError::Validation(
                "installment count must be at least 1".into(),
            ));
        }
        if request.amount_cents <= 0 {
            return Err(CoreError::Validation("amount must be positive".into()));
        }

        let entries = Self::build_entries(&request);
        for entry in &entries {
            TransactionService::validate(ledger, entry)?;
        }

        let ids = entries
            .into_iter()
            .map(|entry| ledger.add_transaction(entry))
            .collect();
        if let Some(card) = ledger.card_mut(request.card_id) {
            card.register_charge(request.amount_cents);
        }
        tracing::info!(
            installments = request.installments,
            total_cents = request.amount_cents,
            "card purchase recorded"
        );
        Ok(ids)
    }

    fn build_entries(request: &PurchaseRequest) -> Vec<Transaction> {
        if request.installments == 1 {
            let entry = Transaction::new(
                request.description.clone(),
                request.amount_cents,
                EntryKind::Expense,
                request.category_id,
                request.date,
                request.scope,
                PaymentMethod::CreditCard,
            )
            .with_card(request.card_id);
            return vec![entry];
        }
        let group_id = Uuid::new_v4();
        let count = request.installments;
        Self::plan(request.amount_cents, request.date, count)
            .into_iter()
            .enumerate()
            .map(|(i, (date, part_cents))| {
                let index = i as u32 + 1;
                Transaction::new(
                    format!("{} ({}/{})", request.description, index, count),
                    part_cents,
                    EntryKind::Expense,
                    request.category_id,
                    date,
                    request.scope,
                    PaymentMethod::CreditCard,
                )
                .with_card(request.card_id)
                .with_installment(InstallmentTag {
                    group_id,
                    index,
                    count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryScope, CreditCard};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_with_card() -> (Ledger, Uuid, Uuid) {
        let mut ledger = Ledger::new("purchases");
        let category_id = ledger.add_category(Category::new(
            "Electronics",
            EntryKind::Expense,
            CategoryScope::Personal,
        ));
        let card_id = ledger.add_card(CreditCard::new(
            "Main",
            "4242",
            "visa",
            1_000_000,
            10,
            3,
            AccountScope::Personal,
        ));
        (ledger, category_id, card_id)
    }

    fn request(category_id: Uuid, card_id: Uuid, installments: u32) -> PurchaseRequest {
        PurchaseRequest {
            description: "Laptop".into(),
            amount_cents: 30_000,
            date: date(2024, 1, 15),
            category_id,
            scope: AccountScope::Personal,
            card_id,
            installments,
        }
    }

    #[test]
    fn plan_steps_one_month_and_clamps_short_months() {
        let plan = InstallmentService::plan(30_000, date(2024, 1, 31), 3);
        assert_eq!(
            plan.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn plan_sum_matches_original_amount() {
        let plan = InstallmentService::plan(10_000, date(2024, 1, 15), 3);
        assert_eq!(plan.iter().map(|(_, c)| c).sum::<i64>(), 10_000);
        assert_eq!(plan[0].1, 3_334);
    }

    #[test]
    fn single_installment_is_recorded_unchanged() {
        let (mut ledger, category_id, card_id) = ledger_with_card();
        let ids =
            InstallmentService::record_purchase(&mut ledger, request(category_id, card_id, 1))
                .unwrap();
        assert_eq!(ids.len(), 1);
        let txn = ledger.transaction(ids[0]).unwrap();
        assert_eq!(txn.description, "Laptop");
        assert!(txn.installment.is_none());
        assert_eq!(ledger.card(card_id).unwrap().used_cents, 30_000);
    }

    #[test]
    fn split_purchase_shares_group_and_suffixes_descriptions() {
        let (mut ledger, category_id, card_id) = ledger_with_card();
        let ids =
            InstallmentService::record_purchase(&mut ledger, request(category_id, card_id, 3))
                .unwrap();
        assert_eq!(ids.len(), 3);
        let entries: Vec<_> = ids
            .iter()
            .map(|id| ledger.transaction(*id).unwrap())
            .collect();
        let group = entries[0].installment.unwrap().group_id;
        for (i, entry) in entries.iter().enumerate() {
            let tag = entry.installment.unwrap();
            assert_eq!(tag.group_id, group);
            assert_eq!(tag.index, i as u32 + 1);
            assert_eq!(tag.count, 3);
            assert_eq!(entry.description, format!("Laptop ({}/3)", i + 1));
        }
        assert_eq!(
            entries.iter().map(|e| e.amount_cents).sum::<i64>(),
            30_000
        );
        assert_eq!(
            entries.iter().map(|e| e.date).collect::<Vec<_>>(),
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
    }

    #[test]
    fn used_limit_bumped_once_by_total() {
        let (mut ledger, category_id, card_id) = ledger_with_card();
        InstallmentService::record_purchase(&mut ledger, request(category_id, card_id, 3))
            .unwrap();
        assert_eq!(ledger.card(card_id).unwrap().used_cents, 30_000);
    }

    #[test]
    fn invalid_plan_applies_nothing() {
        let (mut ledger, _, card_id) = ledger_with_card();
        let bad = request(Uuid::new_v4(), card_id, 3);
        let err = InstallmentService::record_purchase(&mut ledger, bad)
            .expect_err("unknown category must fail the whole plan");
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(ledger.transactions.is_empty());
        assert_eq!(ledger.card(card_id).unwrap().used_cents, 0);
    }

    #[test]
    fn zero_installments_rejected() {
        let (mut ledger, category_id, card_id) = ledger_with_card();
        let err =
            InstallmentService::record_purchase(&mut ledger, request(category_id, card_id, 0))
                .expect_err("zero installments must be rejected");
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
