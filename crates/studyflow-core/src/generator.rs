//! Plan generation.
//!
//! The top-level entry point of the engine. One pass recomputes every
//! pending task's outstanding hours, discards its replaceable sessions,
//! orders the tasks under the configured policy, and places each task's
//! hours into free windows on its eligible days. Locked days pass through
//! byte-for-byte: they are excluded from eligibility, their sessions are
//! never purged, and the insert path rejects them defensively.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::accounting;
use crate::availability;
use crate::commitment::FixedCommitment;
use crate::distribution::{distribute, DistributionStrategy};
use crate::interval::{to_clock_time, to_minutes};
use crate::plan::{ensure_plan, next_session_number, PlanSet, Session, SessionStatus};
use crate::settings::{PlannerSettings, StudyPlanMode};
use crate::task::{Task, TaskStatus};

/// A deadline within this many days makes a task urgent in Eisenhower mode.
const URGENT_WITHIN_DAYS: i64 = 3;

/// A pending task paired with the hours this pass still has to place.
struct Workload<'a> {
    task: &'a Task,
    remaining: f64,
}

/// Generate an updated plan collection.
///
/// Operates on a private clone of `existing_plans` and returns it; the
/// caller's collection is never touched. Tasks whose share cannot be placed
/// keep the shortfall implicitly; feasibility reporting, not this pass,
/// surfaces it.
pub fn generate_plan(
    tasks: &[Task],
    settings: &PlannerSettings,
    commitments: &[FixedCommitment],
    existing_plans: &PlanSet,
    today: NaiveDate,
) -> PlanSet {
    let mut plans = existing_plans.clone();

    // outstanding hours are computed against the incoming snapshot, then
    // each task's replaceable sessions are purged before placement
    let mut pending: Vec<Workload> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .map(|task| Workload {
            task,
            remaining: accounting::remaining_hours(task, &plans),
        })
        .filter(|w| w.remaining > 1e-9)
        .collect();

    for workload in &pending {
        accounting::remove_unlocked_sessions(&workload.task.id, &mut plans);
    }

    order_workloads(&mut pending, settings.study_plan_mode, today);

    for workload in &pending {
        let strategy = strategy_for(workload.task, settings.study_plan_mode, today);
        schedule_task(workload, strategy, settings, commitments, &mut plans, today);
    }

    plans
}

/// Work weekdays strictly between `today` and the buffered deadline,
/// excluding locked days.
fn eligible_days(
    task: &Task,
    settings: &PlannerSettings,
    plans: &PlanSet,
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let cutoff = task.buffered_deadline(settings.buffer_days);
    let mut days = Vec::new();
    let mut date = today + chrono::Duration::days(1);
    while date < cutoff {
        if settings.is_work_day(date) && !plans.get(&date).is_some_and(|p| p.is_locked) {
            days.push(date);
        }
        date += chrono::Duration::days(1);
    }
    days
}

/// Place one task's outstanding hours across its eligible days.
fn schedule_task(
    workload: &Workload,
    strategy: DistributionStrategy,
    settings: &PlannerSettings,
    commitments: &[FixedCommitment],
    plans: &mut PlanSet,
    today: NaiveDate,
) {
    let task = workload.task;
    let days = eligible_days(task, settings, plans, today);
    if days.is_empty() {
        warn!(
            task = %task.id,
            deadline = %task.deadline,
            "no eligible days before the buffered deadline; task skipped"
        );
        return;
    }

    let per_day = distribute(workload.remaining, days.len(), strategy);
    for (&date, &hours) in days.iter().zip(per_day.iter()) {
        if hours < 1e-6 {
            continue;
        }
        let window = availability::free_windows(date, plans.get(&date), commitments, settings)
            .into_iter()
            .find(|w| w.can_fit(hours));
        let Some(window) = window else {
            // this share stays unplaced; surfaced by feasibility reporting
            debug!(task = %task.id, %date, hours, "no window large enough");
            continue;
        };

        let start_minutes = to_minutes(&window.start);
        let session = Session {
            task_id: task.id.clone(),
            session_number: next_session_number(plans, &task.id),
            start_time: window.start.clone(),
            end_time: to_clock_time(start_minutes + (hours * 60.0).round() as u32),
            allocated_hours: hours,
            status: SessionStatus::Scheduled,
            done: false,
            original_date: None,
            original_time: None,
            rescheduled_at: None,
        };
        if let Err(e) = ensure_plan(plans, date, settings).push_session(session) {
            // unreachable through eligible_days; kept as the defensive check
            warn!(task = %task.id, %date, error = %e, "insert rejected");
        }
    }
}

/// Order tasks under the configured policy. Sorting is stable, so equal keys
/// keep the caller's task order.
fn order_workloads(pending: &mut [Workload], mode: StudyPlanMode, today: NaiveDate) {
    match mode {
        // importance first, then the nearer deadline; Balanced's
        // important-block-first partition reduces to the same key
        StudyPlanMode::Even | StudyPlanMode::Balanced => {
            pending.sort_by(|a, b| {
                b.task
                    .important
                    .cmp(&a.task.important)
                    .then(a.task.deadline.cmp(&b.task.deadline))
            });
        }
        // quadrant order: IU, IN, NU, NN; deadline within each quadrant
        StudyPlanMode::Eisenhower => {
            pending.sort_by(|a, b| {
                quadrant_rank(a.task, today)
                    .cmp(&quadrant_rank(b.task, today))
                    .then(a.task.deadline.cmp(&b.task.deadline))
            });
        }
    }
}

fn is_urgent(task: &Task, today: NaiveDate) -> bool {
    task.days_until_deadline(today) <= URGENT_WITHIN_DAYS
}

fn quadrant_rank(task: &Task, today: NaiveDate) -> u8 {
    match (task.important, is_urgent(task, today)) {
        (true, true) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    }
}

/// Strategy per task under the configured policy.
fn strategy_for(task: &Task, mode: StudyPlanMode, today: NaiveDate) -> DistributionStrategy {
    match mode {
        StudyPlanMode::Even | StudyPlanMode::Balanced => DistributionStrategy::Even,
        StudyPlanMode::Eisenhower => match (task.important, is_urgent(task, today)) {
            // both urgent quadrants front-load toward the deadline crunch
            (_, true) => DistributionStrategy::FrontLoad,
            (true, false) => DistributionStrategy::Even,
            (false, false) => DistributionStrategy::BackLoad,
        },
    }
}
