//! Calendar arithmetic for billing cycles and aggregation windows.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::errors::CoreError;

/// A calendar month key, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month `{0}`, expected YYYY-MM")]
pub struct ParseMonthError(String);

impl MonthRef {
    /// `month` must be in 1..=12; callers construct out-of-range values
    /// only through arithmetic bugs, so this is a debug assertion.
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Steps the month key forward or backward, carrying across years.
    pub fn offset(self, months: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    /// Whole months from `other` up to `self`; negative when `other` is later.
    pub fn months_since(self, other: MonthRef) -> i32 {
        (self.year * 12 + self.month as i32) - (other.year * 12 + other.month as i32)
    }

    pub fn first_day(self) -> NaiveDate {
        // month is validated at construction, so the date always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.day_clamped(31)
    }

    /// The given day of this month, clamped to the month's length.
    pub fn day_clamped(self, day: u32) -> NaiveDate {
        let day = day.clamp(1, days_in_month(self.year, self.month));
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthRef {
    type Err = ParseMonthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMonthError(raw.to_owned());
        let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(DeError::custom)
    }
}

/// Number of days in a calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or(NaiveDate::MAX);
    (first_next - Duration::days(1)).day()
}

/// Steps a date by whole calendar months, preserving the day of month and
/// clamping to the last valid day of shorter months
/// (`2024-01-31 + 1 -> 2024-02-29`).
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let target = MonthRef::from_date(date).offset(months);
    target.day_clamped(date.day())
}

/// Half-open date interval `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::Validation(
                "window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// The full calendar month as a window.
    pub fn month(month: MonthRef) -> Self {
        Self {
            start: month.first_day(),
            end: month.offset(1).first_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
