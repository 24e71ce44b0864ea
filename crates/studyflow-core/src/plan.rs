//! Study plans and sessions.
//!
//! One `StudyPlan` per calendar date; the collection is a `BTreeMap` so every
//! pass walks days in deterministic order. A date with no plan is fully open
//! with default capacity. Lock state is a property of the day: a session is
//! locked iff its containing plan is locked.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::settings::PlannerSettings;

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Placed and waiting to happen
    Scheduled,
    /// Worked through to the end
    Completed,
    /// Deliberately dropped; excluded from plan totals
    Skipped,
    /// End time passed without completion
    Missed,
    /// Moved here from another day by redistribution
    Rescheduled,
}

/// A scheduled block of work on one task within one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Task this session works on
    pub task_id: String,
    /// Monotonic per task, never reused, even after redistribution
    pub session_number: u32,
    /// Start clock time, HH:mm
    pub start_time: String,
    /// End clock time, HH:mm
    pub end_time: String,
    /// Hours of work allocated to this session
    pub allocated_hours: f64,
    /// Session status
    pub status: SessionStatus,
    /// Legacy completion flag, independent of `status`
    #[serde(default)]
    pub done: bool,
    /// Date this session lived on before redistribution moved it
    #[serde(default)]
    pub original_date: Option<NaiveDate>,
    /// Start time at the original location
    #[serde(default)]
    pub original_time: Option<String>,
    /// When redistribution moved it
    #[serde(default)]
    pub rescheduled_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether this session's work is already accounted for: finished, or
    /// deliberately dropped. Settled sessions are never purged or moved.
    pub fn is_settled(&self) -> bool {
        self.done || matches!(self.status, SessionStatus::Completed | SessionStatus::Skipped)
    }

    /// Skipped sessions do not count toward a plan's total hours.
    pub fn counts_toward_total(&self) -> bool {
        self.status != SessionStatus::Skipped
    }
}

/// The sessions and lock status for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlan {
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
    /// Cached sum of non-skipped session hours; recomputed after every
    /// structural mutation
    pub total_study_hours: f64,
    /// Per-day capacity in hours
    pub available_hours: f64,
    /// A locked day is immutable to every engine pass
    #[serde(default)]
    pub is_locked: bool,
}

impl StudyPlan {
    /// Create an empty, unlocked plan with the given capacity.
    pub fn new(date: NaiveDate, available_hours: f64) -> Self {
        Self {
            date,
            sessions: Vec::new(),
            total_study_hours: 0.0,
            available_hours,
            is_locked: false,
        }
    }

    /// Recompute `total_study_hours` from the session list.
    pub fn recompute_total(&mut self) {
        self.total_study_hours = self
            .sessions
            .iter()
            .filter(|s| s.counts_toward_total())
            .map(|s| s.allocated_hours)
            .sum();
    }

    /// Append a session and recompute the total.
    ///
    /// Inserting into a locked plan is a policy violation: the call is
    /// rejected and the plan is unchanged.
    pub fn push_session(&mut self, session: Session) -> Result<(), EngineError> {
        if self.is_locked {
            return Err(EngineError::DayLocked { date: self.date });
        }
        self.sessions.push(session);
        self.recompute_total();
        Ok(())
    }

    /// Remove the session identified by `(task_id, session_number)` and
    /// recompute the total. Returns the removed session, or `None` when the
    /// plan is locked or holds no such session.
    pub fn remove_session(&mut self, task_id: &str, session_number: u32) -> Option<Session> {
        if self.is_locked {
            return None;
        }
        let idx = self
            .sessions
            .iter()
            .position(|s| s.task_id == task_id && s.session_number == session_number)?;
        let removed = self.sessions.remove(idx);
        self.recompute_total();
        Some(removed)
    }
}

/// The full plan collection, keyed by date.
pub type PlanSet = BTreeMap<NaiveDate, StudyPlan>;

/// Get the plan for `date`, creating an open one with default capacity when
/// the date has never been planned.
pub fn ensure_plan<'a>(
    plans: &'a mut PlanSet,
    date: NaiveDate,
    settings: &PlannerSettings,
) -> &'a mut StudyPlan {
    plans
        .entry(date)
        .or_insert_with(|| StudyPlan::new(date, settings.daily_available_hours))
}

/// Next session number for a task: one past the highest ever used across all
/// plans, locked days included, so numbers are never reused.
pub fn next_session_number(plans: &PlanSet, task_id: &str) -> u32 {
    plans
        .values()
        .flat_map(|p| p.sessions.iter())
        .filter(|s| s.task_id == task_id)
        .map(|s| s.session_number)
        .max()
        .map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(task_id: &str, number: u32, start: &str, hours: f64) -> Session {
        let start_min = crate::interval::to_minutes(start);
        let end_min = start_min + (hours * 60.0).round() as u32;
        Session {
            task_id: task_id.to_string(),
            session_number: number,
            start_time: start.to_string(),
            end_time: crate::interval::to_clock_time(end_min),
            allocated_hours: hours,
            status: SessionStatus::Scheduled,
            done: false,
            original_date: None,
            original_time: None,
            rescheduled_at: None,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_total_excludes_skipped() {
        let mut plan = StudyPlan::new(date(2), 8.0);
        plan.push_session(make_session("t1", 1, "09:00", 1.0)).unwrap();
        let mut skipped = make_session("t1", 2, "11:00", 2.0);
        skipped.status = SessionStatus::Skipped;
        plan.push_session(skipped).unwrap();
        assert!((plan.total_study_hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_push_into_locked_plan_rejected() {
        let mut plan = StudyPlan::new(date(2), 8.0);
        plan.is_locked = true;
        let err = plan.push_session(make_session("t1", 1, "09:00", 1.0));
        assert!(matches!(err, Err(EngineError::DayLocked { .. })));
        assert!(plan.sessions.is_empty());
    }

    #[test]
    fn test_remove_session_refuses_locked_plan() {
        let mut plan = StudyPlan::new(date(2), 8.0);
        plan.push_session(make_session("t1", 1, "09:00", 1.0)).unwrap();
        plan.is_locked = true;
        assert!(plan.remove_session("t1", 1).is_none());
        assert_eq!(plan.sessions.len(), 1);
    }

    #[test]
    fn test_next_session_number_spans_all_plans() {
        let mut plans = PlanSet::new();
        let settings = PlannerSettings::default();
        ensure_plan(&mut plans, date(2), &settings)
            .push_session(make_session("t1", 1, "09:00", 1.0))
            .unwrap();
        ensure_plan(&mut plans, date(3), &settings)
            .push_session(make_session("t1", 4, "09:00", 1.0))
            .unwrap();
        assert_eq!(next_session_number(&plans, "t1"), 5);
        assert_eq!(next_session_number(&plans, "t2"), 1);
    }

    #[test]
    fn test_ensure_plan_uses_default_capacity() {
        let mut plans = PlanSet::new();
        let settings = PlannerSettings {
            daily_available_hours: 3.5,
            ..Default::default()
        };
        let plan = ensure_plan(&mut plans, date(2), &settings);
        assert!((plan.available_hours - 3.5).abs() < 1e-9);
        assert!(!plan.is_locked);
    }
}
