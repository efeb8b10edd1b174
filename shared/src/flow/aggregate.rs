//! Lot-wide aggregation across sites
//!
//! The all-sites report replays one event per date and kind, each summing
//! every site's rows for that date. Transfers follow a fixed rule: a transfer
//! between two sites of the same lot adds `+q` to that date's incoming total
//! and `-q` to its outgoing total, so inter-site moves never change the
//! lot-wide received or on-hand figures.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::event::{EventStreams, RawEvent};
use crate::types::{format_calendar_date, parse_calendar_date};

/// Per-site rows for one lot, across every site
#[derive(Debug, Clone, Default)]
pub struct LotWideRows {
    /// Received shipments
    pub shipments: Vec<RawEvent>,
    /// Transfers with their unsigned quantity
    pub transfers: Vec<RawEvent>,
    /// Inventory snapshots
    pub snapshots: Vec<RawEvent>,
}

/// Lot-wide streams plus the rows left out of the per-date sums
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedStreams {
    pub streams: EventStreams,
    /// Rows without a parsable date
    pub dropped: usize,
}

/// Collapse per-site rows into one event per date for each kind.
///
/// Undated rows cannot be summed into a date, so they are counted in
/// `dropped` instead of reaching the merge.
pub fn aggregate_all_sites(rows: LotWideRows, label: &str) -> AggregatedStreams {
    let mut dropped = 0;
    let shipments = sum_by_date(&rows.shipments, &mut dropped);
    let transfer_totals = sum_by_date(&rows.transfers, &mut dropped);
    let snapshots = sum_by_date(&rows.snapshots, &mut dropped);

    let streams = EventStreams {
        shipments: to_events(shipments, label),
        transfers_in: to_events(transfer_totals.clone(), label),
        transfers_out: to_events(
            transfer_totals.into_iter().map(|(d, q)| (d, -q)).collect(),
            label,
        ),
        snapshots: to_events(snapshots, label),
    };

    AggregatedStreams { streams, dropped }
}

fn sum_by_date(rows: &[RawEvent], dropped: &mut usize) -> BTreeMap<NaiveDate, i64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        match row.date.as_deref().and_then(parse_calendar_date) {
            Some(date) => *totals.entry(date).or_insert(0) += row.quantity,
            None => *dropped += 1,
        }
    }
    totals
}

fn to_events(totals: BTreeMap<NaiveDate, i64>, label: &str) -> Vec<RawEvent> {
    totals
        .into_iter()
        .map(|(date, quantity)| RawEvent::new(format_calendar_date(date), quantity, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(events: &[RawEvent]) -> Vec<(String, i64)> {
        events
            .iter()
            .map(|e| (e.date.clone().unwrap_or_default(), e.quantity))
            .collect()
    }

    #[test]
    fn test_sums_same_date_across_sites() {
        let rows = LotWideRows {
            shipments: vec![
                RawEvent::new("2024-01-01", 30, "North"),
                RawEvent::new("2024-01-01", 20, "South"),
                RawEvent::new("2024-01-09", 5, "North"),
            ],
            snapshots: vec![
                RawEvent::new("2024-01-05", 25, "North"),
                RawEvent::new("2024-01-05", 15, "South"),
            ],
            ..Default::default()
        };

        let streams = aggregate_all_sites(rows, "Buffer A - L1 (All Sites)").streams;
        assert_eq!(
            quantities(&streams.shipments),
            vec![("2024-01-01".to_string(), 50), ("2024-01-09".to_string(), 5)]
        );
        assert_eq!(
            quantities(&streams.snapshots),
            vec![("2024-01-05".to_string(), 40)]
        );
        assert!(streams
            .shipments
            .iter()
            .all(|e| e.label == "Buffer A - L1 (All Sites)"));
    }

    #[test]
    fn test_transfers_mirror_in_and_out() {
        let rows = LotWideRows {
            transfers: vec![
                RawEvent::new("2024-02-01", 10, "North -> South"),
                RawEvent::new("2024-02-01", 4, "South -> East"),
            ],
            ..Default::default()
        };

        let streams = aggregate_all_sites(rows, "lot").streams;
        assert_eq!(
            quantities(&streams.transfers_in),
            vec![("2024-02-01".to_string(), 14)]
        );
        assert_eq!(
            quantities(&streams.transfers_out),
            vec![("2024-02-01".to_string(), -14)]
        );
    }

    #[test]
    fn test_undated_rows_are_counted_as_dropped() {
        let rows = LotWideRows {
            shipments: vec![
                RawEvent::undated(99, "in transit"),
                RawEvent::new("2024-01-01", 5, "North"),
            ],
            transfers: vec![RawEvent::new("someday", 3, "North -> South")],
            snapshots: vec![RawEvent::new("2024-01-02 08:30:00", 4, "North")],
        };

        let aggregated = aggregate_all_sites(rows, "lot");
        assert_eq!(aggregated.dropped, 2);
        assert_eq!(aggregated.streams.len(), 2);
        assert!(aggregated.streams.transfers_in.is_empty());
        assert_eq!(
            quantities(&aggregated.streams.snapshots),
            vec![("2024-01-02".to_string(), 4)]
        );
    }
}
