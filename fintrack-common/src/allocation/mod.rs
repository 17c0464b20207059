//! Auto-save allocation for incoming income.
//!
//! When an income transaction is flagged `auto_save`, a slice of it is moved
//! onto at most one savings goal. Goals are considered in ascending
//! `priority_level` order and the first goal that can still accept money
//! receives the contribution. The contribution never pushes a goal past its
//! target.

use uuid::Uuid;

use crate::models::goal::Goal;

#[derive(Clone, Debug, PartialEq)]
pub struct AllocationPlan {
    pub goal_id: Uuid,
    pub goal_title: String,
    pub contribution_cents: i64,
}

/// Picks the goal an `auto_save` income should contribute to and how much.
///
/// `goals` is expected in allocation order (ascending priority, oldest
/// first); the sort here is a stable re-sort so callers passing unsorted
/// slices still get deterministic results. Returns `None` when no goal
/// receives a positive contribution.
pub fn plan_allocation(income_amount_cents: i64, goals: &[Goal]) -> Option<AllocationPlan> {
    let mut ordered: Vec<&Goal> = goals.iter().collect();
    ordered.sort_by_key(|g| g.priority_level);

    for goal in ordered {
        if goal.auto_save_percentage <= 0 {
            continue;
        }

        if goal.saved_amount_cents >= goal.target_amount_cents {
            continue;
        }

        let raw_contribution = income_amount_cents * i64::from(goal.auto_save_percentage) / 100;
        let remaining_gap = goal.target_amount_cents - goal.saved_amount_cents;
        let contribution_cents = raw_contribution.min(remaining_gap);

        if contribution_cents > 0 {
            return Some(AllocationPlan {
                goal_id: goal.id,
                goal_title: goal.title.clone(),
                contribution_cents,
            });
        }
    }

    None
}
