//! Fixed commitments.
//!
//! A commitment is an external busy interval unrelated to any task: either
//! recurring over a set of weekdays or one-off over explicit dates, with
//! optional per-date time overrides and deletions.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::interval;

/// Replacement times for a single occurrence of a commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceOverride {
    /// Replacement start, HH:mm; `None` keeps the base start
    #[serde(default)]
    pub start_time: Option<String>,
    /// Replacement end, HH:mm; `None` keeps the base end
    #[serde(default)]
    pub end_time: Option<String>,
}

/// An external, non-task busy interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedCommitment {
    pub id: String,
    pub title: String,
    /// Start clock time, HH:mm
    pub start_time: String,
    /// End clock time, HH:mm
    pub end_time: String,
    /// Recurring commitments apply on `days_of_week`; one-off commitments on
    /// `specific_dates`
    pub recurring: bool,
    /// Weekdays this applies on, 0 = Sunday ... 6 = Saturday
    #[serde(default)]
    pub days_of_week: Vec<u32>,
    /// Explicit dates for one-off commitments
    #[serde(default)]
    pub specific_dates: Vec<NaiveDate>,
    /// Dates on which this occurrence was cancelled
    #[serde(default)]
    pub deleted_occurrences: Vec<NaiveDate>,
    /// Per-date replacement times
    #[serde(default)]
    pub modified_occurrences: BTreeMap<NaiveDate, OccurrenceOverride>,
}

impl FixedCommitment {
    /// Whether this commitment occupies time on `date`, after applying
    /// per-date deletions.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if self.deleted_occurrences.contains(&date) {
            return false;
        }
        if self.recurring {
            self.days_of_week
                .contains(&date.weekday().num_days_from_sunday())
        } else {
            self.specific_dates.contains(&date)
        }
    }

    /// Busy interval on `date` in minutes from midnight, with any per-date
    /// override applied. `None` when the commitment does not occur that day.
    pub fn busy_interval_on(&self, date: NaiveDate) -> Option<(u32, u32)> {
        if !self.applies_on(date) {
            return None;
        }
        let (mut start, mut end) = (self.start_time.as_str(), self.end_time.as_str());
        if let Some(over) = self.modified_occurrences.get(&date) {
            if let Some(s) = &over.start_time {
                start = s;
            }
            if let Some(e) = &over.end_time {
                end = e;
            }
        }
        Some((interval::to_minutes(start), interval::to_minutes(end)))
    }

    /// Check that the base time range is well-formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if interval::to_minutes(&self.end_time) <= interval::to_minutes(&self.start_time) {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        if self.recurring && self.days_of_week.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "days_of_week".into(),
                message: "recurring commitments need at least one weekday".into(),
            });
        }
        if !self.recurring && self.specific_dates.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "specific_dates".into(),
                message: "one-off commitments need at least one date".into(),
            });
        }
        Ok(())
    }
}
