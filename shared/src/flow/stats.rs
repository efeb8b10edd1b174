//! Usage statistics derived from a flow series

use serde::{Deserialize, Serialize};

use super::replay::DataPoint;

/// Consumption summary over a replayed series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UsageStats {
    pub total_consumed: i64,
    pub average_daily_usage: f64,
    /// Span from first to last point, at least one day
    pub days_of_data: i64,
    /// Days until the last recorded inventory runs out at the average rate;
    /// zero when there is no measurable usage
    pub projected_days_remaining: i64,
}

/// Summarize a series; `None` for an empty series
pub fn usage_stats(points: &[DataPoint]) -> Option<UsageStats> {
    let first = points.first()?;
    let last = points.last()?;

    let total_consumed = last.cumulative_used.max(0);
    let days_of_data = (last.date - first.date).num_days().max(1);
    let average_daily_usage = (total_consumed as f64 / days_of_data as f64).max(0.0);

    let projected_days_remaining = if average_daily_usage > 0.0 {
        (last.current_inventory as f64 / average_daily_usage)
            .round()
            .max(0.0) as i64
    } else {
        0
    };

    Some(UsageStats {
        total_consumed,
        average_daily_usage,
        days_of_data,
        projected_days_remaining,
    })
}
