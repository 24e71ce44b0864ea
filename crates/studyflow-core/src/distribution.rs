//! Distribution strategies.
//!
//! Pure functions mapping (total hours, day count) to a per-day hour vector.
//! The result sums to the total within 0.01 h and has no negative entries,
//! with one documented exception: the front- and back-loaded strategies
//! split the day range into thirds, and a third with zero days silently
//! drops its percentage share instead of reallocating it. That matches the
//! long-standing behavior this engine reproduces and is pinned by tests.

use serde::{Deserialize, Serialize};

/// How a task's hours spread over its eligible days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionStrategy {
    /// Equal share per day, remainder to leading days
    Even,
    /// 70% / 20% / 10% across the first/second/last third of the range
    FrontLoad,
    /// 10% / 20% / 70% across the first/second/last third of the range
    BackLoad,
}

/// Spread `total_hours` over `day_count` days under `strategy`.
///
/// `day_count = 0` returns an empty vector; callers treat that as "no
/// placement possible".
pub fn distribute(total_hours: f64, day_count: usize, strategy: DistributionStrategy) -> Vec<f64> {
    if day_count == 0 {
        return Vec::new();
    }
    match strategy {
        DistributionStrategy::Even => distribute_even(total_hours, day_count),
        DistributionStrategy::FrontLoad => {
            distribute_weighted(total_hours, day_count, [0.7, 0.2, 0.1])
        }
        DistributionStrategy::BackLoad => {
            distribute_weighted(total_hours, day_count, [0.1, 0.2, 0.7])
        }
    }
}

/// Equal base share per day, floored to 2 decimals; the remainder is handed
/// to leading days in 0.25 h increments until exhausted.
fn distribute_even(total_hours: f64, day_count: usize) -> Vec<f64> {
    let base = ((total_hours / day_count as f64) * 100.0).floor() / 100.0;
    let mut hours = vec![base; day_count];

    let mut remainder = total_hours - base * day_count as f64;
    let mut day = 0;
    while remainder > 0.01 && day < day_count {
        let add = remainder.min(0.25);
        hours[day] += add;
        remainder -= add;
        day += 1;
    }
    hours
}

/// Split the range into three nearly-equal thirds and give each third its
/// weight of the total, distributed evenly inside the third.
fn distribute_weighted(total_hours: f64, day_count: usize, weights: [f64; 3]) -> Vec<f64> {
    let first_end = day_count.div_ceil(3);
    let second_end = (2 * day_count).div_ceil(3);
    let spans = [
        first_end,
        second_end - first_end,
        day_count - second_end,
    ];

    let mut hours = Vec::with_capacity(day_count);
    for (span, weight) in spans.into_iter().zip(weights) {
        if span == 0 {
            // this third's share is dropped, not reallocated
            continue;
        }
        hours.extend(distribute_even(total_hours * weight, span));
    }
    hours
}
