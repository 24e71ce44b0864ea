//! Remaining-work accounting.
//!
//! The single source of truth for how much of a task still needs a new
//! placement. Recomputed fresh before every generation or redistribution
//! pass; lock state and completion state change between calls, so the value
//! is never cached.

use chrono::NaiveDate;

use crate::plan::{PlanSet, Session};
use crate::task::Task;

/// Hours of `task` still needing placement.
///
/// Counts as already accounted for: sessions that are done, completed,
/// skipped, or resident on a locked day. Never negative.
pub fn remaining_hours(task: &Task, plans: &PlanSet) -> f64 {
    let accounted: f64 = plans
        .values()
        .flat_map(|plan| {
            plan.sessions
                .iter()
                .filter(|s| s.task_id == task.id)
                .filter(move |s| s.is_settled() || plan.is_locked)
        })
        .map(|s| s.allocated_hours)
        .sum();
    (task.estimated_hours - accounted).max(0.0)
}

/// Sessions of `task_id` that are eligible to be discarded and replaced:
/// on a non-locked day and not done/completed/skipped.
pub fn unlocked_sessions(task_id: &str, plans: &PlanSet) -> Vec<(NaiveDate, Session)> {
    plans
        .iter()
        .filter(|(_, plan)| !plan.is_locked)
        .flat_map(|(date, plan)| {
            plan.sessions
                .iter()
                .filter(|s| s.task_id == task_id && !s.is_settled())
                .map(|s| (*date, s.clone()))
        })
        .collect()
}

/// Purge exactly the sessions `unlocked_sessions` reports and recompute each
/// touched plan's total. Locked days are never entered.
pub fn remove_unlocked_sessions(task_id: &str, plans: &mut PlanSet) {
    for plan in plans.values_mut().filter(|p| !p.is_locked) {
        let before = plan.sessions.len();
        plan.sessions
            .retain(|s| s.task_id != task_id || s.is_settled());
        if plan.sessions.len() != before {
            plan.recompute_total();
        }
    }
}
