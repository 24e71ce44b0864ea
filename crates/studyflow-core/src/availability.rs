//! Free-window computation.
//!
//! Finds the open time inside a day's study window after existing sessions
//! and fixed commitments are accounted for, and scans forward for the next
//! day that can absorb a block of a given size.
//!
//! Hard rule: a locked day has zero availability to the rest of the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::commitment::FixedCommitment;
use crate::interval::{merge_intervals, to_clock_time, to_minutes};
use crate::plan::{PlanSet, StudyPlan};
use crate::settings::PlannerSettings;

/// An open stretch of time within the study window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeWindow {
    /// Start clock time, HH:mm
    pub start: String,
    /// End clock time, HH:mm
    pub end: String,
    pub duration_hours: f64,
}

impl FreeWindow {
    fn from_minutes(start: u32, end: u32) -> Self {
        Self {
            start: to_clock_time(start),
            end: to_clock_time(end),
            duration_hours: f64::from(end - start) / 60.0,
        }
    }

    /// Whether a block of `hours` fits inside this window.
    pub fn can_fit(&self, hours: f64) -> bool {
        self.duration_hours + 1e-9 >= hours
    }

    /// A copy truncated to exactly `hours`, anchored at the window start.
    pub fn truncated_to(&self, hours: f64) -> FreeWindow {
        let start = to_minutes(&self.start);
        FreeWindow {
            start: self.start.clone(),
            end: to_clock_time(start + (hours * 60.0).round() as u32),
            duration_hours: hours,
        }
    }
}

/// Compute the ordered free windows for one day.
///
/// Busy time is every non-skipped session on the day's plan plus every
/// commitment occurring on the date. Gaps shorter than the configured
/// minimum session length are not reported.
pub fn free_windows(
    date: NaiveDate,
    plan: Option<&StudyPlan>,
    commitments: &[FixedCommitment],
    settings: &PlannerSettings,
) -> Vec<FreeWindow> {
    if plan.is_some_and(|p| p.is_locked) {
        return Vec::new();
    }

    let (window_start, window_end) = settings.study_window();
    let min_len = settings.min_session_length_minutes;

    let mut busy: Vec<(u32, u32)> = Vec::new();
    if let Some(plan) = plan {
        for session in plan.sessions.iter().filter(|s| s.counts_toward_total()) {
            busy.push((to_minutes(&session.start_time), to_minutes(&session.end_time)));
        }
    }
    for commitment in commitments {
        if let Some(interval) = commitment.busy_interval_on(date) {
            busy.push(interval);
        }
    }

    let merged = merge_intervals(&busy);

    let mut windows = Vec::new();
    let mut cursor = window_start;
    for (start, end) in merged {
        if start >= window_end {
            break;
        }
        if start > cursor {
            let gap_end = start.min(window_end);
            if gap_end - cursor >= min_len {
                windows.push(FreeWindow::from_minutes(cursor, gap_end));
            }
        }
        cursor = cursor.max(end.min(window_end));
    }
    // tail gap after the last busy interval, or the whole window when idle
    if window_end > cursor && window_end - cursor >= min_len {
        windows.push(FreeWindow::from_minutes(cursor, window_end));
    }

    windows
}

/// Scan forward day by day for the first window that can hold `hours`.
///
/// Non-work weekdays and locked days are skipped. The returned window is
/// truncated to exactly `hours`. `None` once `max_days_to_search` days have
/// been exhausted.
pub fn find_next_available_slot(
    hours: f64,
    from_date: NaiveDate,
    max_days_to_search: u32,
    plans: &PlanSet,
    commitments: &[FixedCommitment],
    settings: &PlannerSettings,
) -> Option<(NaiveDate, FreeWindow)> {
    for offset in 0..max_days_to_search {
        let date = from_date + chrono::Duration::days(i64::from(offset));
        if !settings.is_work_day(date) {
            continue;
        }
        let plan = plans.get(&date);
        if plan.is_some_and(|p| p.is_locked) {
            continue;
        }
        if let Some(window) = free_windows(date, plan, commitments, settings)
            .into_iter()
            .find(|w| w.can_fit(hours))
        {
            return Some((date, window.truncated_to(hours)));
        }
    }
    None
}
