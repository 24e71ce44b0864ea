//! Planner settings.
//!
//! Every engine pass receives the full settings snapshot; nothing is read
//! from the environment. Serialized to/from TOML by the CLI harness.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Task-ordering policy for plan generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyPlanMode {
    /// Sort all tasks by importance then deadline, distribute each evenly.
    Even,
    /// Schedule important tasks first, then the rest; each still even.
    Balanced,
    /// Eisenhower quadrants (importance x urgency) with per-quadrant strategies.
    Eisenhower,
}

impl Default for StudyPlanMode {
    fn default() -> Self {
        StudyPlanMode::Even
    }
}

/// Planner settings.
///
/// Weekdays are numbered 0 = Sunday ... 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Per-day study capacity in hours
    #[serde(default = "default_daily_available_hours")]
    pub daily_available_hours: f64,
    /// Weekdays eligible for scheduling
    #[serde(default = "default_work_days")]
    pub work_days: Vec<u32>,
    /// Days subtracted from a deadline before computing eligible days
    #[serde(default)]
    pub buffer_days: u32,
    /// Start of the daily study window (hour of day)
    #[serde(default = "default_window_start")]
    pub study_window_start_hour: u32,
    /// End of the daily study window (hour of day)
    #[serde(default = "default_window_end")]
    pub study_window_end_hour: u32,
    /// Shortest session worth placing, in minutes
    #[serde(default = "default_min_session_length")]
    pub min_session_length_minutes: u32,
    /// Task-ordering policy
    #[serde(default)]
    pub study_plan_mode: StudyPlanMode,
}

fn default_daily_available_hours() -> f64 {
    8.0
}
fn default_work_days() -> Vec<u32> {
    vec![1, 2, 3, 4, 5] // Mon-Fri
}
fn default_window_start() -> u32 {
    6
}
fn default_window_end() -> u32 {
    23
}
fn default_min_session_length() -> u32 {
    15
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            daily_available_hours: default_daily_available_hours(),
            work_days: default_work_days(),
            buffer_days: 0,
            study_window_start_hour: default_window_start(),
            study_window_end_hour: default_window_end(),
            min_session_length_minutes: default_min_session_length(),
            study_plan_mode: StudyPlanMode::default(),
        }
    }
}

impl PlannerSettings {
    /// Whether `date` falls on a configured work weekday.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.work_days
            .contains(&date.weekday().num_days_from_sunday())
    }

    /// Study window as minutes from midnight: `[start, end)`.
    pub fn study_window(&self) -> (u32, u32) {
        (
            self.study_window_start_hour * 60,
            self.study_window_end_hour * 60,
        )
    }

    /// Minimum session length expressed in hours.
    pub fn min_session_hours(&self) -> f64 {
        f64::from(self.min_session_length_minutes) / 60.0
    }

    /// Upper bound for a single block of work: four hours, or the daily
    /// capacity if that is smaller. Shared by session merging and the
    /// frequency feasibility check.
    pub fn max_block_hours(&self) -> f64 {
        self.daily_available_hours.min(4.0)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.daily_available_hours <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "daily_available_hours".into(),
                message: "must be positive".into(),
            });
        }
        if self.work_days.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "work_days".into(),
                message: "at least one work weekday is required".into(),
            });
        }
        if self.work_days.iter().any(|&d| d > 6) {
            return Err(ValidationError::InvalidValue {
                field: "work_days".into(),
                message: "weekday numbers range from 0 (Sunday) to 6 (Saturday)".into(),
            });
        }
        if self.study_window_end_hour <= self.study_window_start_hour
            || self.study_window_end_hour > 24
        {
            return Err(ValidationError::InvalidTimeRange {
                start: format!("{:02}:00", self.study_window_start_hour),
                end: format!("{:02}:00", self.study_window_end_hour),
            });
        }
        if self.min_session_length_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "min_session_length_minutes".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }
}
