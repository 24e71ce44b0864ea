//! Lock governance.
//!
//! Decides whether a day may be locked, flips the flag, and verifies after
//! the fact that no pass ever mutated locked-day content. The integrity
//! validator is the safety net behind the engine's locked-day guarantee:
//! tests and redistribution callers run it over before/after snapshots and
//! expect zero violations.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::plan::{ensure_plan, PlanSet};
use crate::settings::PlannerSettings;
use crate::task::{Task, TaskStatus};

/// How many eligible days ahead the capacity analysis looks.
const CAPACITY_LOOKAHEAD_DAYS: i64 = 14;
/// Pressure thresholds on hours-to-evict vs. spare capacity.
const PRESSURE_MEDIUM: f64 = 0.5;
const PRESSURE_HIGH: f64 = 0.8;
/// Sessions of an important task this close to its deadline block a lock.
const CRITICAL_DEADLINE_DAYS: i64 = 2;

/// Result of the basic lock eligibility check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockCheck {
    pub can_lock: bool,
    /// Sessions still waiting to happen on that day
    pub pending_sessions: usize,
}

/// How hard redistribution would have to work to clear the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedistributionPressure {
    Low,
    Medium,
    High,
}

/// Full pre-lock report: hard blockers, soft warnings, and the capacity
/// analysis over the upcoming eligible days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockValidation {
    pub can_lock: bool,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
    pub pressure: RedistributionPressure,
    pub hours_to_move: f64,
    pub spare_capacity: f64,
}

/// A day can be locked iff nothing on it still needs to happen: every
/// session is done, completed, skipped, or already missed.
pub fn can_lock(date: NaiveDate, plans: &PlanSet) -> LockCheck {
    let pending = plans.get(&date).map_or(0, |plan| {
        plan.sessions
            .iter()
            .filter(|s| !s.is_settled() && s.status != crate::plan::SessionStatus::Missed)
            .count()
    });
    LockCheck {
        can_lock: pending == 0,
        pending_sessions: pending,
    }
}

/// Extended validation with soft warnings and redistribution-pressure
/// analysis. Callers with pending work on the day are expected to run
/// eviction first; this report tells them what that will cost.
pub fn validate_lock(
    date: NaiveDate,
    tasks: &[Task],
    settings: &PlannerSettings,
    plans: &PlanSet,
    today: NaiveDate,
) -> LockValidation {
    let mut blockers = Vec::new();
    let mut warnings = Vec::new();
    let mut hours_to_move = 0.0;

    if let Some(plan) = plans.get(&date) {
        for session in plan.sessions.iter().filter(|s| !s.is_settled()) {
            let Some(task) = tasks
                .iter()
                .find(|t| t.id == session.task_id && t.status == TaskStatus::Pending)
            else {
                continue;
            };
            hours_to_move += session.allocated_hours;
            if task.important && (task.deadline - date).num_days() <= CRITICAL_DEADLINE_DAYS {
                blockers.push(format!(
                    "session for important task '{}' sits within {} days of its deadline",
                    task.title, CRITICAL_DEADLINE_DAYS
                ));
            } else if task.preferred_frequency.is_none() {
                warnings.push(format!(
                    "'{}' is a one-time task; locking displaces its only cadence",
                    task.title
                ));
            }
        }
    }

    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        warnings.push("locking a weekend day leaves little room to recover".to_string());
    }

    let spare_capacity = spare_capacity_ahead(date, settings, plans, today);
    let pressure = classify_pressure(hours_to_move, spare_capacity);

    LockValidation {
        can_lock: blockers.is_empty(),
        blockers,
        warnings,
        pressure,
        hours_to_move,
        spare_capacity,
    }
}

/// Spare hours across the next 14 eligible days (work weekdays, unlocked,
/// excluding the day being locked).
fn spare_capacity_ahead(
    lock_date: NaiveDate,
    settings: &PlannerSettings,
    plans: &PlanSet,
    today: NaiveDate,
) -> f64 {
    let mut spare = 0.0;
    for offset in 0..CAPACITY_LOOKAHEAD_DAYS {
        let date = today + chrono::Duration::days(offset);
        if date == lock_date || !settings.is_work_day(date) {
            continue;
        }
        match plans.get(&date) {
            Some(plan) if plan.is_locked => continue,
            Some(plan) => {
                spare += (settings.daily_available_hours - plan.total_study_hours).max(0.0)
            }
            None => spare += settings.daily_available_hours,
        }
    }
    spare
}

fn classify_pressure(hours_to_move: f64, spare_capacity: f64) -> RedistributionPressure {
    if hours_to_move <= f64::EPSILON {
        return RedistributionPressure::Low;
    }
    if spare_capacity <= 0.0 {
        return RedistributionPressure::High;
    }
    let ratio = hours_to_move / spare_capacity;
    if ratio >= PRESSURE_HIGH {
        RedistributionPressure::High
    } else if ratio >= PRESSURE_MEDIUM {
        RedistributionPressure::Medium
    } else {
        RedistributionPressure::Low
    }
}

/// Flip the lock on, creating an empty locked plan when the date was never
/// planned.
pub fn lock_day(date: NaiveDate, plans: &mut PlanSet, settings: &PlannerSettings) {
    let plan = ensure_plan(plans, date, settings);
    plan.is_locked = true;
}

/// Flip the lock off and restore the default capacity.
pub fn unlock_day(date: NaiveDate, plans: &mut PlanSet, settings: &PlannerSettings) {
    if let Some(plan) = plans.get_mut(&date) {
        plan.is_locked = false;
        plan.available_hours = settings.daily_available_hours;
    }
}

/// Pure before/after comparison: every plan locked in `before` must survive
/// untouched in `after`. Returns one human-readable violation per
/// difference; empty means the pass honored the locked-day contract.
pub fn validate_locked_days_integrity(before: &PlanSet, after: &PlanSet) -> Vec<String> {
    let mut violations = Vec::new();
    for (date, locked_plan) in before.iter().filter(|(_, p)| p.is_locked) {
        let Some(current) = after.get(date) else {
            violations.push(format!("locked plan {date} is missing from the result"));
            continue;
        };
        if !current.is_locked {
            violations.push(format!("locked plan {date} was unlocked"));
        }
        if current.sessions.len() != locked_plan.sessions.len() {
            violations.push(format!(
                "locked plan {date} session count changed ({} -> {})",
                locked_plan.sessions.len(),
                current.sessions.len()
            ));
            continue;
        }
        for (was, is) in locked_plan.sessions.iter().zip(current.sessions.iter()) {
            if was.start_time != is.start_time
                || was.end_time != is.end_time
                || (was.allocated_hours - is.allocated_hours).abs() > 1e-9
            {
                violations.push(format!(
                    "locked plan {date} session {}#{} changed its time range or hours",
                    was.task_id, was.session_number
                ));
            }
        }
    }
    violations
}
