//! Income/expense aggregation over fixed period windows.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::money::percent_change;
use crate::domain::{AccountScope, EntryKind};
use crate::ledger::calendar::{DateWindow, MonthRef};
use crate::ledger::Ledger;

/// Aggregation window selector, anchored at a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    Week,
    Month,
    Year,
}

impl PeriodFilter {
    /// The window ending at the reference day (inclusive): the last seven
    /// days, the month so far, or the year so far.
    pub fn current_window(self, today: NaiveDate) -> DateWindow {
        let end = today + Duration::days(1);
        let start = match self {
            PeriodFilter::Week => today - Duration::days(7),
            PeriodFilter::Month => MonthRef::from_date(today).first_day(),
            PeriodFilter::Year => MonthRef::new(today.year(), 1).first_day(),
        };
        DateWindow { start, end }
    }

    /// The immediately preceding window of the same meaning: the seven
    /// days before the current window, the full prior month, or the full
    /// prior year.
    pub fn previous_window(self, today: NaiveDate) -> DateWindow {
        match self {
            PeriodFilter::Week => {
                let end = today - Duration::days(7);
                DateWindow {
                    start: end - Duration::days(7),
                    end,
                }
            }
            PeriodFilter::Month => DateWindow::month(MonthRef::from_date(today).prev()),
            PeriodFilter::Year => {
                let year = MonthRef::from_date(today).year;
                DateWindow {
                    start: MonthRef::new(year - 1, 1).first_day(),
                    end: MonthRef::new(year, 1).first_day(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PeriodSummary {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
}

/// Current totals next to the prior window's, with percentage changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodComparison {
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub income_change_pct: f64,
    pub expense_change_pct: f64,
    pub balance_change_pct: f64,
}

/// Expense share of one category within a window.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySpend {
    pub category_id: Uuid,
    pub name: String,
    pub total_cents: i64,
    pub share_pct: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(
        ledger: &Ledger,
        scope: AccountScope,
        window: &DateWindow,
    ) -> PeriodSummary {
        let mut income_cents = 0;
        let mut expense_cents = 0;
        for txn in ledger.transactions_in(scope) {
            if !window.contains(txn.date) {
                continue;
            }
            match txn.kind {
                EntryKind::Income => income_cents += txn.amount_cents,
                EntryKind::Expense => expense_cents += txn.amount_cents,
            }
        }
        PeriodSummary {
            income_cents,
            expense_cents,
            balance_cents: income_cents - expense_cents,
        }
    }

    pub fn compare(
        ledger: &Ledger,
        scope: AccountScope,
        filter: PeriodFilter,
        today: NaiveDate,
    ) -> PeriodComparison {
        let current = Self::summarize(ledger, scope, &filter.current_window(today));
        let previous = Self::summarize(ledger, scope, &filter.previous_window(today));
        PeriodComparison {
            income_change_pct: percent_change(previous.income_cents, current.income_cents),
            expense_change_pct: percent_change(previous.expense_cents, current.expense_cents),
            balance_change_pct: percent_change(previous.balance_cents, current.balance_cents),
            current,
            previous,
        }
    }

    /// Per-category expense totals within the window, largest first, with
    /// each category's share of the window's total spend.
    pub fn category_breakdown(
        ledger: &Ledger,
        scope: AccountScope,
        window: &DateWindow,
    ) -> Vec<CategorySpend> {
        let mut totals: Vec<(Uuid, i64)> = Vec::new();
        for txn in ledger.transactions_in(scope) {
            if txn.kind != EntryKind::Expense || !window.contains(txn.date) {
                continue;
            }
            match totals.iter_mut().find(|(id, _)| *id == txn.category_id) {
                Some((_, total)) => *total += txn.amount_cents,
                None => totals.push((txn.category_id, txn.amount_cents)),
            }
        }
        let grand_total: i64 = totals.iter().map(|(_, total)| total).sum();
        let mut breakdown: Vec<CategorySpend> = totals
            .into_iter()
            .map(|(category_id, total_cents)| CategorySpend {
                category_id,
                name: ledger
                    .category(category_id)
                    .map_or_else(|| "unknown".to_owned(), |c| c.name.clone()),
                total_cents,
                share_pct: if grand_total > 0 {
                    total_cents as f64 / grand_total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        breakdown.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryScope, PaymentMethod, Transaction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_ledger() -> (Ledger, Uuid, Uuid) {
        let mut ledger = Ledger::new("summary");
        let income = ledger.add_category(Category::new(
            "Consulting",
            EntryKind::Income,
            CategoryScope::Both,
        ));
        let expense = ledger.add_category(Category::new(
            "Snacks",
            EntryKind::Expense,
            CategoryScope::Both,
        ));
        (ledger, income, expense)
    }

    fn entry(
        category_id: Uuid,
        kind: EntryKind,
        cents: i64,
        on: NaiveDate,
        scope: AccountScope,
    ) -> Transaction {
        Transaction::new(
            "entry",
            cents,
            kind,
            category_id,
            on,
            scope,
            PaymentMethod::Cash,
        )
    }

    #[test]
    fn month_window_runs_from_first_day_through_today() {
        let window = PeriodFilter::Month.current_window(date(2024, 5, 15));
        assert!(window.contains(date(2024, 5, 1)));
        assert!(window.contains(date(2024, 5, 15)));
        assert!(!window.contains(date(2024, 5, 16)));
        assert!(!window.contains(date(2024, 4, 30)));
    }

    #[test]
    fn previous_month_is_the_full_prior_calendar_month() {
        let window = PeriodFilter::Month.previous_window(date(2024, 5, 15));
        assert!(window.contains(date(2024, 4, 1)));
        assert!(window.contains(date(2024, 4, 30)));
        assert!(!window.contains(date(2024, 5, 1)));
    }

    #[test]
    fn week_windows_do_not_overlap() {
        let today = date(2024, 5, 15);
        let current = PeriodFilter::Week.current_window(today);
        let previous = PeriodFilter::Week.previous_window(today);
        assert!(current.contains(today));
        assert!(current.contains(today - Duration::days(7)));
        assert!(!previous.contains(today - Duration::days(7)));
        assert!(previous.contains(today - Duration::days(8)));
        assert_eq!(previous.days(), 7);
    }

    #[test]
    fn totals_are_scoped_and_windowed() {
        let (mut ledger, income, expense) = seeded_ledger();
        let today = date(2024, 5, 15);
        ledger.add_transaction(entry(
            income,
            EntryKind::Income,
            100_000,
            date(2024, 5, 10),
            AccountScope::Personal,
        ));
        ledger.add_transaction(entry(
            expense,
            EntryKind::Expense,
            30_000,
            date(2024, 5, 12),
            AccountScope::Personal,
        ));
        // outside the window
        ledger.add_transaction(entry(
            expense,
            EntryKind::Expense,
            99_000,
            date(2024, 4, 2),
            AccountScope::Personal,
        ));
        // other scope
        ledger.add_transaction(entry(
            income,
            EntryKind::Income,
            55_000,
            date(2024, 5, 12),
            AccountScope::Business,
        ));
        let summary = SummaryService::summarize(
            &ledger,
            AccountScope::Personal,
            &PeriodFilter::Month.current_window(today),
        );
        assert_eq!(summary.income_cents, 100_000);
        assert_eq!(summary.expense_cents, 30_000);
        assert_eq!(summary.balance_cents, 70_000);
    }

    #[test]
    fn zero_previous_income_reports_plus_hundred_percent() {
        let (mut ledger, income, _) = seeded_ledger();
        let today = date(2024, 5, 15);
        ledger.add_transaction(entry(
            income,
            EntryKind::Income,
            50_000,
            date(2024, 5, 10),
            AccountScope::Personal,
        ));
        let comparison =
            SummaryService::compare(&ledger, AccountScope::Personal, PeriodFilter::Month, today);
        assert_eq!(comparison.income_change_pct, 100.0);
        assert_eq!(comparison.expense_change_pct, 0.0);
    }

    #[test]
    fn breakdown_orders_by_spend_and_sums_shares() {
        let (mut ledger, _, snacks) = seeded_ledger();
        let transport = ledger.add_category(Category::new(
            "Rides",
            EntryKind::Expense,
            CategoryScope::Both,
        ));
        let window = PeriodFilter::Month.current_window(date(2024, 5, 15));
        ledger.add_transaction(entry(
            snacks,
            EntryKind::Expense,
            2_500,
            date(2024, 5, 3),
            AccountScope::Personal,
        ));
        ledger.add_transaction(entry(
            transport,
            EntryKind::Expense,
            7_500,
            date(2024, 5, 4),
            AccountScope::Personal,
        ));
        let breakdown =
            SummaryService::category_breakdown(&ledger, AccountScope::Personal, &window);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category_id, transport);
        assert_eq!(breakdown[0].share_pct, 75.0);
        assert_eq!(breakdown[1].share_pct, 25.0);
    }
}
