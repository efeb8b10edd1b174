//! Cumulative-flow report tests
//!
//! Tests for the flow reconstruction including:
//! - Replay properties (prefix sums, snapshot override, non-negative usage)
//! - Usage statistics bounds
//! - All-sites aggregation agreeing with per-site reports

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use shared::flow::{
    aggregate_all_sites, merge_events, reconstruct, EventKind, EventStreams, LotWideRows,
    RawEvent,
};

fn day(offset: i64) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (start + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

fn event(offset: i64, quantity: i64) -> RawEvent {
    RawEvent::new(day(offset), quantity, "Buffer A - L-1 @ North Lab")
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Shipment, count, shipment over sixty days
    #[test]
    fn test_reference_scenario() {
        let report = reconstruct(EventStreams {
            shipments: vec![event(0, 50), event(60, 50)],
            snapshots: vec![event(31, 40)],
            ..Default::default()
        });

        let points: Vec<(i64, i64, i64)> = report
            .data_points
            .iter()
            .map(|p| (p.cumulative_received, p.cumulative_used, p.current_inventory))
            .collect();
        assert_eq!(points, vec![(50, 0, 50), (50, 10, 40), (100, 10, 90)]);

        let stats = report.stats.unwrap();
        assert_eq!(stats.total_consumed, 10);
        assert_eq!(stats.days_of_data, 60);
        assert!((stats.average_daily_usage - 10.0 / 60.0).abs() < 1e-9);
        assert_eq!(stats.projected_days_remaining, 540);
    }

    /// Outgoing transfers reduce received stock
    #[test]
    fn test_transfer_out_reduces_received() {
        let report = reconstruct(EventStreams {
            shipments: vec![event(0, 50)],
            transfers_out: vec![event(5, -20)],
            ..Default::default()
        });

        let last = report.data_points.last().unwrap();
        assert_eq!(last.cumulative_received, 30);
        assert_eq!(last.event_type, EventKind::TransferOut);
    }

    /// A count taken the same day as a delivery sees the delivery
    #[test]
    fn test_snapshot_sorts_after_same_day_flows() {
        let report = reconstruct(EventStreams {
            shipments: vec![event(3, 10)],
            snapshots: vec![event(3, 8)],
            transfers_in: vec![event(3, 5)],
            ..Default::default()
        });

        let kinds: Vec<EventKind> = report.data_points.iter().map(|p| p.event_type).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Shipment, EventKind::TransferIn, EventKind::Snapshot]
        );
        assert_eq!(report.data_points[2].cumulative_used, 7);
    }

    /// Rows without a readable date are skipped and counted
    #[test]
    fn test_undated_rows_dropped() {
        let report = reconstruct(EventStreams {
            shipments: vec![
                event(0, 10),
                RawEvent::undated(99, "missing"),
                RawEvent::new("not a date", 99, "garbled"),
            ],
            ..Default::default()
        });

        assert_eq!(report.data_points.len(), 1);
        assert_eq!(report.dropped_events, 2);
    }

    /// Empty history has no statistics at all
    #[test]
    fn test_empty_history() {
        let report = reconstruct(EventStreams::default());
        assert!(report.data_points.is_empty());
        assert!(report.stats.is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Day offsets within one quarter
    fn offset_strategy() -> impl Strategy<Value = i64> {
        0i64..90
    }

    /// Positive flow quantities
    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1i64..=500
    }

    fn flows_strategy(max: usize) -> impl Strategy<Value = Vec<RawEvent>> {
        prop::collection::vec((offset_strategy(), quantity_strategy()), 0..max)
            .prop_map(|rows| rows.into_iter().map(|(d, q)| event(d, q)).collect())
    }

    fn streams_strategy() -> impl Strategy<Value = EventStreams> {
        (
            flows_strategy(10),
            flows_strategy(6),
            flows_strategy(6),
            prop::collection::vec((offset_strategy(), 0i64..=500), 0..5),
        )
            .prop_map(|(shipments, transfers_in, transfers_out, snapshots)| EventStreams {
                shipments,
                transfers_in,
                transfers_out: transfers_out
                    .into_iter()
                    .map(|e| RawEvent { quantity: -e.quantity, ..e })
                    .collect(),
                snapshots: snapshots.into_iter().map(|(d, q)| event(d, q)).collect(),
            })
    }

    /// Per-site history of one lot: (shipments, snapshots before the final count, final count)
    type SiteHistory = (Vec<(i64, i64)>, Vec<(i64, i64)>, i64);

    fn site_history_strategy() -> impl Strategy<Value = SiteHistory> {
        (
            prop::collection::vec((offset_strategy(), quantity_strategy()), 0..6),
            prop::collection::vec((offset_strategy(), 0i64..=500), 0..3),
            0i64..=500,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Cumulative used is never negative, whatever the history
        #[test]
        fn prop_cumulative_used_non_negative(streams in streams_strategy()) {
            let report = reconstruct(streams);
            for point in &report.data_points {
                prop_assert!(point.cumulative_used >= 0);
            }
        }

        /// One data point per dated event, in non-decreasing (date, kind) order
        #[test]
        fn prop_points_follow_timeline(streams in streams_strategy()) {
            let total = streams.len();
            let report = reconstruct(streams);
            prop_assert_eq!(report.data_points.len(), total);
            for pair in report.data_points.windows(2) {
                prop_assert!(
                    (pair[0].date, pair[0].event_type) <= (pair[1].date, pair[1].event_type)
                );
            }
        }

        /// Without counts or outgoing transfers, inventory tracks received stock
        #[test]
        fn prop_flow_only_prefix_sums(
            shipments in flows_strategy(12),
            transfers_in in flows_strategy(6)
        ) {
            let total: i64 = shipments.iter().chain(&transfers_in).map(|e| e.quantity).sum();
            let merged = merge_events(EventStreams {
                shipments: shipments.clone(),
                transfers_in: transfers_in.clone(),
                ..Default::default()
            });
            let report = reconstruct(EventStreams {
                shipments,
                transfers_in,
                ..Default::default()
            });

            let mut running = 0;
            for (point, event) in report.data_points.iter().zip(&merged.events) {
                running += event.quantity;
                prop_assert_eq!(point.cumulative_received, running);
                prop_assert_eq!(point.current_inventory, point.cumulative_received);
                prop_assert_eq!(point.cumulative_used, 0);
            }
            prop_assert_eq!(running, total);
        }

        /// A count replaces the running inventory; later flows apply on top of it
        #[test]
        fn prop_snapshot_overrides_inventory(
            before in prop::collection::vec((0i64..30, quantity_strategy()), 0..6),
            count in 0i64..=500,
            after in prop::collection::vec((31i64..60, quantity_strategy()), 0..6)
        ) {
            let added: i64 = after.iter().map(|(_, q)| q).sum();
            let shipments = before
                .into_iter()
                .chain(after)
                .map(|(d, q)| event(d, q))
                .collect();

            let report = reconstruct(EventStreams {
                shipments,
                snapshots: vec![event(30, count)],
                ..Default::default()
            });

            let snapshot = report
                .data_points
                .iter()
                .find(|p| p.event_type == EventKind::Snapshot)
                .unwrap();
            prop_assert_eq!(snapshot.current_inventory, count);
            prop_assert_eq!(report.data_points.last().unwrap().current_inventory, count + added);
        }

        /// Statistics exist exactly when there is history, and stay in range
        #[test]
        fn prop_stats_bounds(streams in streams_strategy()) {
            let report = reconstruct(streams);
            match report.stats {
                None => prop_assert!(report.data_points.is_empty()),
                Some(stats) => {
                    prop_assert!(!report.data_points.is_empty());
                    prop_assert!(stats.total_consumed >= 0);
                    prop_assert!(stats.average_daily_usage >= 0.0);
                    prop_assert!(stats.days_of_data >= 1);
                    prop_assert!(stats.projected_days_remaining >= 0);
                    if stats.total_consumed == 0 {
                        prop_assert_eq!(stats.projected_days_remaining, 0);
                    }
                }
            }
        }

        /// Events that all fall on one day still count as one day of data
        #[test]
        fn prop_same_day_is_one_day(
            offset in offset_strategy(),
            quantities in prop::collection::vec(quantity_strategy(), 1..6)
        ) {
            let report = reconstruct(EventStreams {
                shipments: quantities.iter().map(|q| event(offset, *q)).collect(),
                ..Default::default()
            });
            prop_assert_eq!(report.stats.unwrap().days_of_data, 1);
        }

        /// On a day every site is counted, the lot-wide inventory is the sum of
        /// the per-site inventories, transfers included
        #[test]
        fn prop_all_sites_matches_sum_of_sites(
            sites in prop::collection::vec(site_history_strategy(), 2..4),
            moves in prop::collection::vec(
                (offset_strategy(), quantity_strategy(), 0usize..4, 0usize..4),
                0..6
            )
        ) {
            let final_day = 90;
            let site_count = sites.len();
            let mut per_site: Vec<EventStreams> = vec![EventStreams::default(); site_count];
            let mut lot_wide = LotWideRows::default();

            for (idx, (shipments, counts, final_count)) in sites.iter().enumerate() {
                for (d, q) in shipments {
                    per_site[idx].shipments.push(event(*d, *q));
                    lot_wide.shipments.push(event(*d, *q));
                }
                let all_counts = counts.iter().copied().chain([(final_day, *final_count)]);
                for (d, q) in all_counts {
                    per_site[idx].snapshots.push(event(d, q));
                    lot_wide.snapshots.push(event(d, q));
                }
            }

            for (d, q, from, to) in moves {
                let (from, to) = (from % site_count, to % site_count);
                if from == to {
                    continue;
                }
                per_site[from].transfers_out.push(event(d, -q));
                per_site[to].transfers_in.push(event(d, q));
                lot_wide.transfers.push(event(d, q));
            }

            let scoped_total: i64 = per_site
                .into_iter()
                .map(|streams| {
                    reconstruct(streams)
                        .data_points
                        .last()
                        .map(|p| p.current_inventory)
                        .unwrap_or(0)
                })
                .sum();

            let lot_wide = aggregate_all_sites(lot_wide, "Buffer A - L-1 (All Sites)");
            let aggregated = reconstruct(lot_wide.streams);
            let last = aggregated.data_points.last().unwrap();
            prop_assert_eq!(last.event_type, EventKind::Snapshot);
            prop_assert_eq!(last.current_inventory, scoped_total);
        }

        /// Inter-site transfers never change the lot-wide received total
        #[test]
        fn prop_all_sites_transfers_net_zero(
            shipments in flows_strategy(8),
            transfers in flows_strategy(8)
        ) {
            let shipped: i64 = shipments.iter().map(|e| e.quantity).sum();
            let report = reconstruct(aggregate_all_sites(
                LotWideRows { shipments, transfers, snapshots: vec![] },
                "Buffer A - L-1 (All Sites)",
            ).streams);

            if let Some(last) = report.data_points.last() {
                prop_assert_eq!(last.cumulative_received, shipped);
            }
        }
    }
}
