//! Task types.
//!
//! Tasks are owned by the caller; the engine reads them and never writes
//! back. Outstanding-hour values computed per pass live in generator-local
//! state, not on the task itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Still needs placement work
    Pending,
    /// All work finished
    Completed,
    /// Kept for history, never scheduled again
    Archived,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Requested study cadence, used only by the feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyFrequency {
    Daily,
    ThreeTimesWeekly,
    Weekly,
    Flexible,
}

/// A unit of work with a deadline and an importance flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Total estimated work in hours
    pub estimated_hours: f64,
    /// Calendar deadline
    pub deadline: NaiveDate,
    /// Importance flag; drives ordering and priority scoring
    pub important: bool,
    /// Task status
    #[serde(default)]
    pub status: TaskStatus,
    /// Requested study cadence (optional hint)
    #[serde(default)]
    pub preferred_frequency: Option<StudyFrequency>,
    /// Minimum block size hint in minutes (optional)
    #[serde(default)]
    pub min_block_minutes: Option<u32>,
}

impl Task {
    /// Whole days from `today` until the deadline; negative once overdue.
    pub fn days_until_deadline(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    /// Deadline with the configured buffer subtracted. Eligible scheduling
    /// days lie strictly before this date.
    pub fn buffered_deadline(&self, buffer_days: u32) -> NaiveDate {
        self.deadline - chrono::Duration::days(i64::from(buffer_days))
    }
}
