pub mod check;
pub mod init;
pub mod lock;
pub mod plan;
pub mod sessions;

use chrono::NaiveDate;

/// Resolve the working date: an explicit `--today` wins, otherwise the
/// local calendar date.
pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}
