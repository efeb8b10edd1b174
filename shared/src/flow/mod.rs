//! Cumulative-flow reconstruction for inventory reports
//!
//! Rebuilds a running inventory series for one lot (at one site, or summed
//! across all sites) from its recorded history:
//!
//! 1. [`merge`] combines received shipments, incoming transfers, outgoing
//!    transfers and inventory snapshots into one dated timeline.
//! 2. [`replay`] folds the timeline into [`DataPoint`]s carrying cumulative
//!    received, cumulative used and current inventory.
//! 3. [`stats`] summarizes the series into [`UsageStats`].
//!
//! Everything here is pure: callers fetch events (already cut off at the
//! "view as of" date) and hand them in as plain data.

pub mod aggregate;
pub mod event;
pub mod merge;
pub mod replay;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use aggregate::{aggregate_all_sites, AggregatedStreams, LotWideRows};
pub use event::{EventKind, EventStreams, FlowEvent, RawEvent};
pub use merge::{merge_events, MergedEvents};
pub use replay::{replay, DataPoint, FlowState};
pub use stats::{usage_stats, UsageStats};

/// A reconstructed flow series and its summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowReport {
    pub data_points: Vec<DataPoint>,
    /// `None` when there is no history at all, as opposed to zero usage
    pub stats: Option<UsageStats>,
    /// Events skipped because their date was missing or unparsable
    #[serde(default)]
    pub dropped_events: usize,
}

/// Merge, replay and summarize one scope's event streams
pub fn reconstruct(streams: EventStreams) -> FlowReport {
    let MergedEvents { events, dropped } = merge_events(streams);
    let data_points = replay(&events);
    let stats = usage_stats(&data_points);

    FlowReport {
        data_points,
        stats,
        dropped_events: dropped,
    }
}
