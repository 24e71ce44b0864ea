//! Feasibility checks.
//!
//! Cheap guards that run before the allocation machinery: can a task's
//! hours fit under its requested cadence at all, and does a new commitment
//! collide with an existing one. Both produce reports, never errors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::commitment::FixedCommitment;
use crate::interval::to_minutes;
use crate::settings::PlannerSettings;
use crate::task::{StudyFrequency, Task};

/// Outcome of the frequency/deadline check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyCheck {
    pub feasible: bool,
    /// Sessions obtainable under the cadence before the buffered deadline
    pub sessions_available: u32,
    /// Upper bound on schedulable hours at that cadence
    pub max_hours: f64,
    pub reason: Option<String>,
}

/// Estimate whether `task` fits under its requested cadence before the
/// buffered deadline.
///
/// Daily and flexible cadences count every eligible work day; weekly counts
/// one session per started week, three-times-weekly three per started week
/// (never more than the work days available). Each session is capped at
/// `min(4, daily_available_hours)`.
pub fn check_frequency_deadline_conflict(
    task: &Task,
    settings: &PlannerSettings,
    today: NaiveDate,
) -> FrequencyCheck {
    let cutoff = task.buffered_deadline(settings.buffer_days);
    let mut work_days = 0u32;
    let mut window_days = 0u32;
    let mut date = today + chrono::Duration::days(1);
    while date < cutoff {
        window_days += 1;
        if settings.is_work_day(date) {
            work_days += 1;
        }
        date += chrono::Duration::days(1);
    }

    let weeks = window_days.div_ceil(7);
    let sessions = match task.preferred_frequency.unwrap_or(StudyFrequency::Flexible) {
        StudyFrequency::Daily | StudyFrequency::Flexible => work_days,
        StudyFrequency::ThreeTimesWeekly => (weeks * 3).min(work_days),
        StudyFrequency::Weekly => weeks.min(work_days),
    };

    let max_hours = f64::from(sessions) * settings.max_block_hours();
    let feasible = max_hours + 0.01 >= task.estimated_hours;
    let reason = (!feasible).then(|| {
        format!(
            "'{}' needs {:.1}h but the requested cadence allows at most {} sessions (≤{:.1}h) before {}",
            task.title, task.estimated_hours, sessions, max_hours, cutoff
        )
    });

    FrequencyCheck {
        feasible,
        sessions_available: sessions,
        max_hours,
        reason,
    }
}

/// How a new commitment collides with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    /// Same date domain and overlapping times
    Strict,
    /// Recurring/one-off mix that coincides; treated as an override, not a
    /// hard conflict
    Override,
}

/// One detected collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentConflict {
    pub commitment_id: String,
    pub commitment_title: String,
    pub kind: ConflictKind,
}

/// Check a new commitment against the existing list.
///
/// A conflict needs overlapping clock times and an overlapping date domain:
/// two recurring commitments collide on a shared weekday, two one-off
/// commitments on a shared date, and a recurring/one-off mix is flagged as
/// an override case when an explicit date lands on a covered weekday.
pub fn check_commitment_conflicts(
    new: &FixedCommitment,
    existing: &[FixedCommitment],
) -> Vec<CommitmentConflict> {
    existing
        .iter()
        .filter(|other| other.id != new.id)
        .filter_map(|other| {
            if !times_overlap(new, other) {
                return None;
            }
            let kind = domain_overlap(new, other)?;
            Some(CommitmentConflict {
                commitment_id: other.id.clone(),
                commitment_title: other.title.clone(),
                kind,
            })
        })
        .collect()
}

fn times_overlap(a: &FixedCommitment, b: &FixedCommitment) -> bool {
    to_minutes(&a.start_time) < to_minutes(&b.end_time)
        && to_minutes(&a.end_time) > to_minutes(&b.start_time)
}

fn domain_overlap(a: &FixedCommitment, b: &FixedCommitment) -> Option<ConflictKind> {
    match (a.recurring, b.recurring) {
        (true, true) => a
            .days_of_week
            .iter()
            .any(|d| b.days_of_week.contains(d))
            .then_some(ConflictKind::Strict),
        (false, false) => a
            .specific_dates
            .iter()
            .any(|d| b.specific_dates.contains(d))
            .then_some(ConflictKind::Strict),
        (true, false) => dates_hit_weekdays(&b.specific_dates, &a.days_of_week)
            .then_some(ConflictKind::Override),
        (false, true) => dates_hit_weekdays(&a.specific_dates, &b.days_of_week)
            .then_some(ConflictKind::Override),
    }
}

fn dates_hit_weekdays(dates: &[NaiveDate], weekdays: &[u32]) -> bool {
    use chrono::Datelike;
    dates
        .iter()
        .any(|d| weekdays.contains(&d.weekday().num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap() // 2026-03-02 is a Monday
    }

    fn make_task(estimated: f64, deadline: NaiveDate, freq: Option<StudyFrequency>) -> Task {
        Task {
            id: "t1".into(),
            title: "Thesis chapter".into(),
            estimated_hours: estimated,
            deadline,
            important: false,
            status: TaskStatus::Pending,
            preferred_frequency: freq,
            min_block_minutes: None,
        }
    }

    fn commitment(id: &str, start: &str, end: &str, recurring: bool) -> FixedCommitment {
        FixedCommitment {
            id: id.into(),
            title: format!("Commitment {id}"),
            start_time: start.into(),
            end_time: end.into(),
            recurring,
            days_of_week: if recurring { vec![1, 3] } else { vec![] },
            specific_dates: if recurring { vec![] } else { vec![date(4)] }, // a Wednesday
            deleted_occurrences: vec![],
            modified_occurrences: Default::default(),
        }
    }

    #[test]
    fn test_weekly_cadence_can_be_infeasible() {
        // ~2 weeks -> 2 weekly sessions x 4h = 8h < 20h
        let task = make_task(20.0, date(16), Some(StudyFrequency::Weekly));
        let check =
            check_frequency_deadline_conflict(&task, &PlannerSettings::default(), date(2));
        assert!(!check.feasible);
        assert!(check.reason.as_deref().unwrap().contains("Thesis chapter"));
    }

    #[test]
    fn test_daily_cadence_is_feasible_for_same_task() {
        let task = make_task(20.0, date(16), Some(StudyFrequency::Daily));
        let check =
            check_frequency_deadline_conflict(&task, &PlannerSettings::default(), date(2));
        assert!(check.feasible);
        assert!(check.reason.is_none());
        // Tue 3 .. Sun 15 holds 9 work days
        assert_eq!(check.sessions_available, 9);
    }

    #[test]
    fn test_three_times_weekly_caps_at_work_days() {
        let task = make_task(1.0, date(5), Some(StudyFrequency::ThreeTimesWeekly));
        let check =
            check_frequency_deadline_conflict(&task, &PlannerSettings::default(), date(2));
        // window is Tue/Wed only: 3x/week estimate caps at 2
        assert_eq!(check.sessions_available, 2);
    }

    #[test]
    fn test_recurring_pair_conflicts_on_shared_weekday() {
        let a = commitment("new", "10:00", "12:00", true);
        let existing = vec![commitment("old", "11:00", "13:00", true)];
        let conflicts = check_commitment_conflicts(&a, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Strict);
    }

    #[test]
    fn test_disjoint_times_never_conflict() {
        let a = commitment("new", "08:00", "09:00", true);
        let existing = vec![commitment("old", "11:00", "13:00", true)];
        assert!(check_commitment_conflicts(&a, &existing).is_empty());
    }

    #[test]
    fn test_one_off_pair_conflicts_on_shared_date() {
        let a = commitment("new", "10:00", "12:00", false);
        let existing = vec![commitment("old", "11:00", "13:00", false)];
        let conflicts = check_commitment_conflicts(&a, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Strict);
    }

    #[test]
    fn test_mixed_pair_is_an_override_case() {
        // one-off on Wednesday vs. recurring on Mon/Wed
        let a = commitment("new", "10:00", "12:00", false);
        let existing = vec![commitment("old", "11:00", "13:00", true)];
        let conflicts = check_commitment_conflicts(&a, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Override);
    }

    #[test]
    fn test_mixed_pair_off_weekday_is_clean() {
        let mut one_off = commitment("new", "10:00", "12:00", false);
        one_off.specific_dates = vec![date(3)]; // Tuesday, not in {Mon, Wed}
        let existing = vec![commitment("old", "11:00", "13:00", true)];
        assert!(check_commitment_conflicts(&one_off, &existing).is_empty());
    }
}
