//! Session redistribution.
//!
//! Two flavors over the same machinery: rescuing sessions that were missed
//! on past unlocked days, and evicting sessions from a day that is about to
//! be locked. Both process candidates in a deterministic priority order,
//! reuse the availability engine for placement, and report every session
//! they could not move instead of failing the pass.
//!
//! Neither flavor ever writes to, or removes from, a locked plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::availability;
use crate::commitment::FixedCommitment;
use crate::plan::{ensure_plan, next_session_number, PlanSet, Session, SessionStatus};
use crate::settings::PlannerSettings;
use crate::task::{Task, TaskStatus};

/// Importance adds this much to every priority score.
const IMPORTANCE_WEIGHT: i64 = 1000;
/// A missed session of an already-overdue task outranks everything else.
const OVERDUE_WEIGHT: i64 = 2000;
/// Eviction search horizon in days.
const EVICTION_HORIZON_DAYS: i64 = 14;
/// Missed-session search horizon in days.
const MISSED_HORIZON_DAYS: i64 = 30;

/// A session successfully moved to a new day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovedSession {
    pub task_id: String,
    /// Number of the replacement session
    pub session_number: u32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub start_time: String,
    pub allocated_hours: f64,
}

/// A session that could not be placed anywhere before its deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedSession {
    pub task_id: String,
    pub session_number: u32,
    pub date: NaiveDate,
    pub allocated_hours: f64,
    pub reason: String,
}

/// Counts, a success flag, and human-readable suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedistributionSummary {
    pub moved_count: usize,
    pub failed_count: usize,
    pub success: bool,
    pub suggestions: Vec<String>,
}

impl RedistributionSummary {
    fn new(moved: usize, failed: usize) -> Self {
        let suggestions = if failed > 0 {
            vec![
                "increase daily available hours to open more capacity".to_string(),
                "extend task deadlines or reduce estimated hours".to_string(),
            ]
        } else {
            Vec::new()
        };
        Self {
            moved_count: moved,
            failed_count: failed,
            success: failed == 0,
            suggestions,
        }
    }
}

/// The updated plan collection plus per-session results.
#[derive(Debug, Clone)]
pub struct RedistributionOutcome {
    pub plans: PlanSet,
    pub moved: Vec<MovedSession>,
    pub failed: Vec<FailedSession>,
    pub summary: RedistributionSummary,
}

/// Priority of a missed session: importance, then how close (or far past)
/// the deadline is. The weights are policy, not incidental.
fn missed_priority(task: &Task, today: NaiveDate) -> i64 {
    let mut score = if task.important { IMPORTANCE_WEIGHT } else { 0 };
    let days_left = task.days_until_deadline(today);
    if days_left < 0 {
        score += OVERDUE_WEIGHT;
    } else {
        score += (100 - days_left).max(0);
    }
    score
}

/// Priority of a session displaced by a lock: importance plus banded
/// deadline proximity.
fn eviction_priority(task: &Task, today: NaiveDate) -> i64 {
    let mut score = if task.important { IMPORTANCE_WEIGHT } else { 0 };
    let days_left = task.days_until_deadline(today);
    score += if days_left <= 1 {
        500
    } else if days_left <= 3 {
        300
    } else if days_left <= 7 {
        200
    } else {
        0
    };
    score
}

struct Candidate<'a> {
    date: NaiveDate,
    session: Session,
    task: &'a Task,
    score: i64,
}

/// Move sessions missed on past unlocked days forward to the next feasible
/// slot before each task's buffered deadline.
///
/// A session counts as missed when its day is strictly before `today` and it
/// is neither done nor completed nor skipped; only sessions of still-pending
/// tasks are touched.
pub fn redistribute_missed_sessions(
    tasks: &[Task],
    settings: &PlannerSettings,
    commitments: &[FixedCommitment],
    plans: &PlanSet,
    today: NaiveDate,
) -> RedistributionOutcome {
    let mut working = plans.clone();

    let mut candidates: Vec<Candidate> = Vec::new();
    for (&date, plan) in plans.iter().filter(|(d, p)| **d < today && !p.is_locked) {
        for session in plan.sessions.iter().filter(|s| !s.is_settled()) {
            let Some(task) = pending_task(tasks, &session.task_id) else {
                continue;
            };
            candidates.push(Candidate {
                date,
                session: session.clone(),
                task,
                score: missed_priority(task, today),
            });
        }
    }
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let mut moved = Vec::new();
    let mut failed = Vec::new();
    for candidate in candidates {
        let cutoff = candidate.task.buffered_deadline(settings.buffer_days);
        let slot = find_slot(
            &candidate,
            &working,
            commitments,
            settings,
            today,
            cutoff,
            MISSED_HORIZON_DAYS,
            None,
        );
        match slot {
            Some((to_date, window)) => {
                relocate(
                    &mut working,
                    &candidate,
                    to_date,
                    window,
                    settings,
                    today,
                    &mut moved,
                );
            }
            None => failed.push(fail(&candidate, "no available slot found before the deadline")),
        }
    }

    let summary = RedistributionSummary::new(moved.len(), failed.len());
    RedistributionOutcome {
        plans: working,
        moved,
        failed,
        summary,
    }
}

/// Evict every unsettled session of a still-pending task from `date`, ahead
/// of locking that day.
///
/// The search covers the next 14 days, bounded by each task's buffered
/// deadline, and requires spare capacity on the target day before looking
/// for a window inside it.
pub fn evict_sessions_for_lock(
    date: NaiveDate,
    tasks: &[Task],
    settings: &PlannerSettings,
    commitments: &[FixedCommitment],
    plans: &PlanSet,
    today: NaiveDate,
) -> RedistributionOutcome {
    let mut working = plans.clone();

    let mut candidates: Vec<Candidate> = Vec::new();
    match plans.get(&date) {
        Some(plan) if plan.is_locked => {
            warn!(%date, "eviction requested for an already-locked day; nothing to do");
        }
        Some(plan) => {
            for session in plan.sessions.iter().filter(|s| !s.is_settled()) {
                let Some(task) = pending_task(tasks, &session.task_id) else {
                    continue;
                };
                candidates.push(Candidate {
                    date,
                    session: session.clone(),
                    task,
                    score: eviction_priority(task, today),
                });
            }
        }
        None => {}
    }
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let mut moved = Vec::new();
    let mut failed = Vec::new();
    for candidate in candidates {
        let cutoff = candidate.task.buffered_deadline(settings.buffer_days);
        let slot = find_slot(
            &candidate,
            &working,
            commitments,
            settings,
            today,
            cutoff,
            EVICTION_HORIZON_DAYS,
            Some(settings.daily_available_hours),
        );
        match slot {
            Some((to_date, window)) => {
                relocate(
                    &mut working,
                    &candidate,
                    to_date,
                    window,
                    settings,
                    today,
                    &mut moved,
                );
            }
            None => failed.push(fail(&candidate, "no available slots found within deadline")),
        }
    }

    let summary = RedistributionSummary::new(moved.len(), failed.len());
    RedistributionOutcome {
        plans: working,
        moved,
        failed,
        summary,
    }
}

fn pending_task<'a>(tasks: &'a [Task], task_id: &str) -> Option<&'a Task> {
    tasks
        .iter()
        .find(|t| t.id == task_id && t.status == TaskStatus::Pending)
}

/// Scan forward from `today` for a day that can absorb the candidate:
/// a work day, not locked, not the candidate's own origin, before `cutoff`,
/// optionally with spare capacity, holding a big-enough free window.
#[allow(clippy::too_many_arguments)]
fn find_slot(
    candidate: &Candidate,
    plans: &PlanSet,
    commitments: &[FixedCommitment],
    settings: &PlannerSettings,
    today: NaiveDate,
    cutoff: NaiveDate,
    horizon_days: i64,
    capacity_limit: Option<f64>,
) -> Option<(NaiveDate, availability::FreeWindow)> {
    let hours = candidate.session.allocated_hours;
    for offset in 0..horizon_days {
        let date = today + chrono::Duration::days(offset);
        if date >= cutoff {
            break;
        }
        if date == candidate.date || !settings.is_work_day(date) {
            continue;
        }
        let plan = plans.get(&date);
        if plan.is_some_and(|p| p.is_locked) {
            continue;
        }
        if let Some(limit) = capacity_limit {
            let load = plan.map_or(0.0, |p| p.total_study_hours);
            if load + hours > limit + 1e-9 {
                continue;
            }
        }
        if let Some(window) = availability::free_windows(date, plan, commitments, settings)
            .into_iter()
            .find(|w| w.can_fit(hours))
        {
            return Some((date, window.truncated_to(hours)));
        }
    }
    None
}

/// Delete the original session from its unlocked origin plan and append the
/// replacement, carrying provenance. Both plans' totals are recomputed in
/// full.
fn relocate(
    working: &mut PlanSet,
    candidate: &Candidate,
    to_date: NaiveDate,
    window: availability::FreeWindow,
    settings: &PlannerSettings,
    today: NaiveDate,
    moved: &mut Vec<MovedSession>,
) {
    // number before removal so the retired number can never be handed out again
    let number = next_session_number(working, &candidate.task.id);

    let Some(origin) = working.get_mut(&candidate.date) else {
        return;
    };
    if origin
        .remove_session(&candidate.session.task_id, candidate.session.session_number)
        .is_none()
    {
        warn!(
            task = %candidate.session.task_id,
            date = %candidate.date,
            "origin session vanished before relocation"
        );
        return;
    }

    let replacement = Session {
        task_id: candidate.session.task_id.clone(),
        session_number: number,
        start_time: window.start.clone(),
        end_time: window.end.clone(),
        allocated_hours: candidate.session.allocated_hours,
        status: SessionStatus::Rescheduled,
        done: false,
        original_date: Some(candidate.date),
        original_time: Some(candidate.session.start_time.clone()),
        rescheduled_at: today.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
    };
    let target = ensure_plan(working, to_date, settings);
    match target.push_session(replacement) {
        Ok(()) => moved.push(MovedSession {
            task_id: candidate.session.task_id.clone(),
            session_number: number,
            from_date: candidate.date,
            to_date,
            start_time: window.start,
            allocated_hours: candidate.session.allocated_hours,
        }),
        Err(e) => {
            // find_slot never offers a locked day; keep the defensive log
            warn!(task = %candidate.session.task_id, %to_date, error = %e, "relocation rejected");
        }
    }
}

fn fail(candidate: &Candidate, reason: &str) -> FailedSession {
    FailedSession {
        task_id: candidate.session.task_id.clone(),
        session_number: candidate.session.session_number,
        date: candidate.date,
        allocated_hours: candidate.session.allocated_hours,
        reason: reason.to_string(),
    }
}
