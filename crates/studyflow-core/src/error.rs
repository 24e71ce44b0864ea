//! Core error types for studyflow-core.
//!
//! The engine has no fatal paths in normal operation: infeasible placements
//! degrade to per-session failure reports, and policy violations surface as
//! typed errors the caller logs and drops.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for studyflow-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Attempted to insert into or mutate a locked day. The operation is a
    /// no-op; caller-visible state is unchanged.
    #[error("day {date} is locked")]
    DayLocked { date: NaiveDate },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid clock-time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange { start: String, end: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
