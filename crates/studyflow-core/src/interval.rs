//! Clock-time conversion and busy-interval merging.
//!
//! Times are minutes from midnight over half-open `[start, end)` intervals.
//! Every higher component builds on these three operations.

/// Convert an `HH:mm` clock string to minutes from midnight.
///
/// # Panics
/// Malformed clock strings are a caller contract violation and panic;
/// callers own the `HH:mm` encoding end to end.
pub fn to_minutes(clock: &str) -> u32 {
    let (h, m) = clock
        .split_once(':')
        .expect("clock time must be in HH:mm form");
    let hours: u32 = h.parse().expect("clock hour must be numeric");
    let minutes: u32 = m.parse().expect("clock minute must be numeric");
    hours * 60 + minutes
}

/// Convert minutes from midnight back to an `HH:mm` clock string.
pub fn to_clock_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Merge overlapping or touching intervals into a sorted, non-overlapping list.
///
/// Sorts by start, then folds: an interval whose start is at or before the
/// current end extends it, anything else opens a new interval.
pub fn merge_intervals(intervals: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut sorted: Vec<(u32, u32)> = intervals.to_vec();
    sorted.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start <= last.1 => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minutes() {
        assert_eq!(to_minutes("00:00"), 0);
        assert_eq!(to_minutes("06:30"), 390);
        assert_eq!(to_minutes("23:59"), 1439);
        assert_eq!(to_minutes("9:05"), 545);
    }

    #[test]
    fn test_to_clock_time() {
        assert_eq!(to_clock_time(0), "00:00");
        assert_eq!(to_clock_time(390), "06:30");
        assert_eq!(to_clock_time(1439), "23:59");
    }

    #[test]
    #[should_panic]
    fn test_malformed_clock_panics() {
        to_minutes("noon");
    }

    #[test]
    fn test_merge_disjoint() {
        let merged = merge_intervals(&[(600, 660), (720, 780)]);
        assert_eq!(merged, vec![(600, 660), (720, 780)]);
    }

    #[test]
    fn test_merge_overlapping() {
        let merged = merge_intervals(&[(600, 700), (660, 780), (90, 120)]);
        assert_eq!(merged, vec![(90, 120), (600, 780)]);
    }

    #[test]
    fn test_merge_touching_extends() {
        // start == current end counts as an extension, not a new interval
        let merged = merge_intervals(&[(600, 660), (660, 720)]);
        assert_eq!(merged, vec![(600, 720)]);
    }

    #[test]
    fn test_merge_contained() {
        let merged = merge_intervals(&[(600, 800), (650, 700)]);
        assert_eq!(merged, vec![(600, 800)]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_intervals(&[]).is_empty());
    }
}
