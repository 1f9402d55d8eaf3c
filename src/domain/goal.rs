use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings goal. Deposits accumulate in isolation from the transaction
/// list; completion latches once and never unwinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub target_cents: i64,
    pub current_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(title: impl Into<String>, target_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            target_cents,
            current_cents: 0,
            deadline: None,
            completed: false,
            completed_at: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn apply_deposit(&mut self, amount_cents: i64, at: DateTime<Utc>) {
        self.current_cents += amount_cents;
        self.latch_completion(at);
    }

    /// Manual completion: pins the balance to the target.
    pub fn force_complete(&mut self, at: DateTime<Utc>) {
        self.current_cents = self.target_cents;
        self.latch_completion(at);
    }

    fn latch_completion(&mut self, at: DateTime<Utc>) {
        if !self.completed && self.current_cents >= self.target_cents {
            self.completed = true;
            self.completed_at = Some(at);
        }
    }

    pub fn progress_percent(&self) -> f64 {
        if self.target_cents <= 0 {
            return 0.0;
        }
        self.current_cents as f64 / self.target_cents as f64 * 100.0
    }
}
