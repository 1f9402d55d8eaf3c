//! Savings goals: deposits, completion, removal.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::time::Clock;
use crate::domain::Goal;
use crate::errors::{CoreError, Result};
use crate::ledger::Ledger;

pub struct GoalService;

impl GoalService {
    pub fn create(
        ledger: &mut Ledger,
        title: impl Into<String>,
        target_cents: i64,
        deadline: Option<NaiveDate>,
    ) -> Result<Uuid> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CoreError::Validation("goal title is required".into()));
        }
        if target_cents <= 0 {
            return Err(CoreError::Validation(
                "goal target must be positive".into(),
            ));
        }
        let mut goal = Goal::new(title, target_cents);
        if let Some(deadline) = deadline {
            goal = goal.with_deadline(deadline);
        }
        Ok(ledger.add_goal(goal))
    }

    /// Adds to the goal's balance. Reaching the target completes the goal
    /// once; later deposits keep accumulating without touching the
    /// completion stamp.
    pub fn deposit(
        ledger: &mut Ledger,
        goal_id: Uuid,
        amount_cents: i64,
        clock: &dyn Clock,
    ) -> Result<()> {
        if amount_cents <= 0 {
            return Err(CoreError::Validation(
                "deposit amount must be positive".into(),
            ));
        }
        let now = clock.now();
        let goal = ledger
            .goal_mut(goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))?;
        goal.apply_deposit(amount_cents, now);
        if goal.completed {
            tracing::info!(%goal_id, "goal target reached");
        }
        ledger.touch();
        Ok(())
    }

    /// Manual completion: pins the balance to the target and latches the
    /// completed state.
    pub fn mark_complete(ledger: &mut Ledger, goal_id: Uuid, clock: &dyn Clock) -> Result<()> {
        let now = clock.now();
        let goal = ledger
            .goal_mut(goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))?;
        goal.force_complete(now);
        ledger.touch();
        Ok(())
    }

    /// Goals are isolated accumulators; removing one, completed or not,
    /// leaves the transaction list untouched.
    pub fn remove(ledger: &mut Ledger, goal_id: Uuid) -> Result<Goal> {
        ledger
            .remove_goal(goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))
    }

    pub fn list(ledger: &Ledger) -> Vec<&Goal> {
        ledger.goals.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;

    fn clock_at(y: i32, m: u32, d: u32) -> FixedClock {
        FixedClock::at_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn deposit_accumulates_and_completes_at_target() {
        let mut ledger = Ledger::new("goals");
        let goal_id = GoalService::create(&mut ledger, "Trip", 100_000, None).unwrap();
        let clock = clock_at(2024, 5, 1);
        GoalService::deposit(&mut ledger, goal_id, 60_000, &clock).unwrap();
        assert!(!ledger.goal(goal_id).unwrap().completed);
        GoalService::deposit(&mut ledger, goal_id, 40_000, &clock).unwrap();
        let goal = ledger.goal(goal_id).unwrap();
        assert!(goal.completed);
        assert_eq!(goal.current_cents, 100_000);
        assert!(goal.completed_at.is_some());
    }

    #[test]
    fn completion_is_monotonic() {
        let mut ledger = Ledger::new("goals");
        let goal_id = GoalService::create(&mut ledger, "Trip", 50_000, None).unwrap();
        let first = clock_at(2024, 5, 1);
        GoalService::deposit(&mut ledger, goal_id, 50_000, &first).unwrap();
        let stamped = ledger.goal(goal_id).unwrap().completed_at;

        let later = clock_at(2024, 6, 1);
        GoalService::deposit(&mut ledger, goal_id, 10_000, &later).unwrap();
        let goal = ledger.goal(goal_id).unwrap();
        assert!(goal.completed);
        assert_eq!(goal.completed_at, stamped);
        assert_eq!(goal.current_cents, 60_000);
    }

    #[test]
    fn mark_complete_forces_balance_to_target() {
        let mut ledger = Ledger::new("goals");
        let goal_id = GoalService::create(&mut ledger, "Emergency fund", 80_000, None).unwrap();
        let clock = clock_at(2024, 5, 1);
        GoalService::deposit(&mut ledger, goal_id, 15_000, &clock).unwrap();
        GoalService::mark_complete(&mut ledger, goal_id, &clock).unwrap();
        let goal = ledger.goal(goal_id).unwrap();
        assert!(goal.completed);
        assert_eq!(goal.current_cents, 80_000);
    }

    #[test]
    fn removing_a_completed_goal_has_no_ledger_side_effect() {
        let mut ledger = Ledger::new("goals");
        let goal_id = GoalService::create(&mut ledger, "Trip", 10_000, None).unwrap();
        let clock = clock_at(2024, 5, 1);
        GoalService::deposit(&mut ledger, goal_id, 10_000, &clock).unwrap();
        let removed = GoalService::remove(&mut ledger, goal_id).unwrap();
        assert!(removed.completed);
        assert!(ledger.transactions.is_empty());
        assert!(ledger.goals.is_empty());
    }

    #[test]
    fn rejects_invalid_inputs() {
        let mut ledger = Ledger::new("goals");
        assert!(GoalService::create(&mut ledger, "  ", 10_000, None).is_err());
        assert!(GoalService::create(&mut ledger, "Trip", 0, None).is_err());
        let goal_id = GoalService::create(&mut ledger, "Trip", 10_000, None).unwrap();
        let clock = clock_at(2024, 5, 1);
        assert!(GoalService::deposit(&mut ledger, goal_id, 0, &clock).is_err());
        assert!(GoalService::deposit(&mut ledger, Uuid::new_v4(), 100, &clock).is_err());
    }
}
