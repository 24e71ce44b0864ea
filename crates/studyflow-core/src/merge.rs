//! Same-task session merging.
//!
//! Collapses a day's fragments of one task into a single block when the
//! combined length still fits a reasonable sitting. Total planned time is
//! preserved; the merged session keeps the earliest start and the smallest
//! session number of its group.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::interval::{to_clock_time, to_minutes};
use crate::plan::{PlanSet, Session, SessionStatus};
use crate::settings::PlannerSettings;

/// Merge multi-session tasks on one unlocked day.
///
/// Only sessions that still have to happen participate; a group is merged
/// when its summed hours lie within `[min_session_length, min(4,
/// daily_available_hours)]`. Returns the number of groups merged.
pub fn combine_sessions(
    date: NaiveDate,
    plans: &mut PlanSet,
    settings: &PlannerSettings,
) -> usize {
    let Some(plan) = plans.get_mut(&date) else {
        return 0;
    };
    if plan.is_locked {
        warn!(%date, "combine requested for a locked day; nothing to do");
        return 0;
    }

    let mut groups: BTreeMap<String, Vec<Session>> = BTreeMap::new();
    for session in plan.sessions.iter().filter(|s| !s.is_settled()) {
        groups
            .entry(session.task_id.clone())
            .or_default()
            .push(session.clone());
    }

    let mut merged_count = 0;
    for (task_id, mut group) in groups {
        if group.len() < 2 {
            continue;
        }
        group.sort_by_key(|s| to_minutes(&s.start_time));
        let total: f64 = group.iter().map(|s| s.allocated_hours).sum();
        if total < settings.min_session_hours() || total > settings.max_block_hours() {
            continue;
        }

        let start = group[0].start_time.clone();
        let number = group.iter().map(|s| s.session_number).min().unwrap_or(1);
        let start_minutes = to_minutes(&start);
        let merged = Session {
            task_id: task_id.clone(),
            session_number: number,
            start_time: start,
            end_time: to_clock_time(start_minutes + (total * 60.0).round() as u32),
            allocated_hours: total,
            status: SessionStatus::Scheduled,
            done: false,
            original_date: None,
            original_time: None,
            rescheduled_at: None,
        };

        plan.sessions
            .retain(|s| s.task_id != task_id || s.is_settled());
        plan.sessions.push(merged);
        merged_count += 1;
    }

    if merged_count > 0 {
        plan.sessions.sort_by_key(|s| to_minutes(&s.start_time));
        plan.recompute_total();
    }
    merged_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::StudyPlan;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn make_session(task_id: &str, number: u32, start: &str, hours: f64) -> Session {
        let start_min = to_minutes(start);
        Session {
            task_id: task_id.into(),
            session_number: number,
            start_time: start.into(),
            end_time: to_clock_time(start_min + (hours * 60.0).round() as u32),
            allocated_hours: hours,
            status: SessionStatus::Scheduled,
            done: false,
            original_date: None,
            original_time: None,
            rescheduled_at: None,
        }
    }

    fn seed(sessions: Vec<Session>) -> PlanSet {
        let mut plan = StudyPlan::new(date(4), 8.0);
        plan.sessions = sessions;
        plan.recompute_total();
        let mut plans = PlanSet::new();
        plans.insert(date(4), plan);
        plans
    }

    #[test]
    fn test_two_fragments_merge_keeping_earliest_start() {
        let mut plans = seed(vec![
            make_session("t1", 2, "14:00", 1.5),
            make_session("t1", 1, "09:00", 1.0),
        ]);
        let merged = combine_sessions(date(4), &mut plans, &PlannerSettings::default());
        assert_eq!(merged, 1);

        let plan = plans.get(&date(4)).unwrap();
        assert_eq!(plan.sessions.len(), 1);
        let session = &plan.sessions[0];
        assert_eq!(session.start_time, "09:00");
        assert_eq!(session.end_time, "11:30");
        assert!((session.allocated_hours - 2.5).abs() < 1e-9);
        assert_eq!(session.session_number, 1);
        assert!((plan.total_study_hours - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_group_stays_split() {
        // 3h + 2h exceeds the 4h block cap
        let mut plans = seed(vec![
            make_session("t1", 1, "08:00", 3.0),
            make_session("t1", 2, "13:00", 2.0),
        ]);
        let merged = combine_sessions(date(4), &mut plans, &PlannerSettings::default());
        assert_eq!(merged, 0);
        assert_eq!(plans.get(&date(4)).unwrap().sessions.len(), 2);
    }

    #[test]
    fn test_block_cap_follows_daily_capacity() {
        let settings = PlannerSettings {
            daily_available_hours: 2.0,
            ..Default::default()
        };
        // 1h + 1.5h would merge under the default cap, but capacity is 2h
        let mut plans = seed(vec![
            make_session("t1", 1, "09:00", 1.0),
            make_session("t1", 2, "14:00", 1.5),
        ]);
        assert_eq!(combine_sessions(date(4), &mut plans, &settings), 0);
    }

    #[test]
    fn test_settled_sessions_do_not_participate() {
        let mut done = make_session("t1", 1, "09:00", 1.0);
        done.done = true;
        let mut plans = seed(vec![
            done,
            make_session("t1", 2, "11:00", 1.0),
            make_session("t1", 3, "14:00", 1.0),
        ]);
        let merged = combine_sessions(date(4), &mut plans, &PlannerSettings::default());
        assert_eq!(merged, 1);
        let plan = plans.get(&date(4)).unwrap();
        assert_eq!(plan.sessions.len(), 2);
        // the done session survives untouched
        assert!(plan.sessions.iter().any(|s| s.done));
        // the merged pair keeps the smaller number of the two movable ones
        assert!(plan
            .sessions
            .iter()
            .any(|s| !s.done && s.session_number == 2 && (s.allocated_hours - 2.0).abs() < 1e-9));
    }

    #[test]
    fn test_locked_day_is_untouched() {
        let mut plans = seed(vec![
            make_session("t1", 1, "09:00", 1.0),
            make_session("t1", 2, "14:00", 1.0),
        ]);
        plans.get_mut(&date(4)).unwrap().is_locked = true;
        assert_eq!(
            combine_sessions(date(4), &mut plans, &PlannerSettings::default()),
            0
        );
        assert_eq!(plans.get(&date(4)).unwrap().sessions.len(), 2);
    }

    #[test]
    fn test_unplanned_day_is_a_no_op() {
        let mut plans = PlanSet::new();
        assert_eq!(
            combine_sessions(date(4), &mut plans, &PlannerSettings::default()),
            0
        );
    }
}
