//! Replaying a timeline into a cumulative-flow series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::{EventKind, FlowEvent};

/// One point of the cumulative-flow series, emitted per replayed event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub cumulative_received: i64,
    /// Never negative; see [`FlowState::cumulative_used`]
    pub cumulative_used: i64,
    pub current_inventory: i64,
    pub event_type: EventKind,
    pub event_details: String,
}

/// Running totals carried across the replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowState {
    cumulative_received: i64,
    current_inventory: i64,
    has_baseline: bool,
}

impl FlowState {
    pub fn cumulative_received(&self) -> i64 {
        self.cumulative_received
    }

    pub fn current_inventory(&self) -> i64 {
        self.current_inventory
    }

    /// Whether a snapshot has been seen yet
    pub fn has_baseline(&self) -> bool {
        self.has_baseline
    }

    /// Modeled consumption, clamped at zero.
    ///
    /// Inventory can exceed received stock when shipment records are
    /// missing; that reads as zero usage rather than negative usage.
    pub fn cumulative_used(&self) -> i64 {
        (self.cumulative_received - self.current_inventory).max(0)
    }

    /// Apply one event and return the resulting data point
    pub fn apply(&mut self, event: &FlowEvent) -> DataPoint {
        match event.kind {
            EventKind::Shipment | EventKind::TransferIn => {
                self.cumulative_received += event.quantity;
                if self.has_baseline {
                    self.current_inventory += event.quantity;
                } else {
                    // Nothing is assumed consumed before the first count
                    self.current_inventory = self.cumulative_received;
                }
            }
            EventKind::TransferOut => {
                // quantity is already negative
                self.cumulative_received += event.quantity;
                if self.has_baseline {
                    self.current_inventory += event.quantity;
                }
            }
            EventKind::Snapshot => {
                self.current_inventory = event.quantity;
                self.has_baseline = true;
            }
        }

        DataPoint {
            date: event.date,
            cumulative_received: self.cumulative_received,
            cumulative_used: self.cumulative_used(),
            current_inventory: self.current_inventory,
            event_type: event.kind,
            event_details: event.label.clone(),
        }
    }
}

/// Replay an ordered timeline from an empty state
pub fn replay(events: &[FlowEvent]) -> Vec<DataPoint> {
    let mut state = FlowState::default();
    events.iter().map(|event| state.apply(event)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    fn ev(kind: EventKind, d: u32, quantity: i64) -> FlowEvent {
        FlowEvent::new(kind, day(d), quantity, "Buffer A - L1 @ North")
    }

    fn triples(points: &[DataPoint]) -> Vec<(i64, i64, i64)> {
        points
            .iter()
            .map(|p| (p.cumulative_received, p.cumulative_used, p.current_inventory))
            .collect()
    }

    #[test]
    fn test_receiving_without_baseline_tracks_received() {
        let points = replay(&[
            ev(EventKind::Shipment, 1, 20),
            ev(EventKind::TransferIn, 2, 5),
            ev(EventKind::Shipment, 3, 10),
        ]);
        assert_eq!(triples(&points), vec![(20, 0, 20), (25, 0, 25), (35, 0, 35)]);
    }

    #[test]
    fn test_snapshot_overrides_inventory() {
        let points = replay(&[
            ev(EventKind::Shipment, 1, 100),
            ev(EventKind::Snapshot, 5, 60),
            ev(EventKind::Shipment, 6, 20),
            ev(EventKind::Snapshot, 9, 70),
        ]);
        assert_eq!(
            triples(&points),
            vec![(100, 0, 100), (100, 40, 60), (120, 40, 80), (120, 50, 70)]
        );
    }

    #[test]
    fn test_transfer_out_reduces_received() {
        let points = replay(&[ev(EventKind::Shipment, 1, 50), ev(EventKind::TransferOut, 2, -20)]);
        let last = points.last().unwrap();
        assert_eq!(last.cumulative_received, 30);
        // No baseline yet: inventory is left where the shipment put it
        assert_eq!(last.current_inventory, 50);
        assert_eq!(last.cumulative_used, 0);
    }

    #[test]
    fn test_transfer_out_after_baseline_reduces_inventory() {
        let points = replay(&[
            ev(EventKind::Shipment, 1, 50),
            ev(EventKind::Snapshot, 2, 45),
            ev(EventKind::TransferOut, 3, -20),
        ]);
        assert_eq!(triples(&points).last(), Some(&(30, 5, 25)));
    }

    #[test]
    fn test_snapshot_above_received_clamps_usage() {
        let points = replay(&[ev(EventKind::Shipment, 1, 10), ev(EventKind::Snapshot, 2, 25)]);
        assert_eq!(points[1].current_inventory, 25);
        assert_eq!(points[1].cumulative_used, 0);
    }

    #[test]
    fn test_snapshot_first_sets_baseline() {
        let mut state = FlowState::default();
        let point = state.apply(&ev(EventKind::Snapshot, 1, 12));
        assert!(state.has_baseline());
        assert_eq!(point.current_inventory, 12);
        assert_eq!(point.cumulative_received, 0);
        assert_eq!(point.cumulative_used, 0);

        let point = state.apply(&ev(EventKind::Shipment, 2, 8));
        assert_eq!(point.current_inventory, 20);
        assert_eq!(point.cumulative_received, 8);
    }

    #[test]
    fn test_points_carry_event_metadata() {
        let points = replay(&[ev(EventKind::TransferIn, 4, 3)]);
        assert_eq!(points[0].date, day(4));
        assert_eq!(points[0].event_type, EventKind::TransferIn);
        assert_eq!(points[0].event_details, "Buffer A - L1 @ North");
    }

    #[test]
    fn test_replay_empty() {
        assert!(replay(&[]).is_empty());
    }
}
