//! Dashboard risk alert tests
//!
//! Tests for the alert rules including:
//! - Priority of expired, expiring and low-stock alerts
//! - Stale site detection
//! - Alert ordering

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use shared::alerts::{
    classify_stock_position, collect_risk_alerts, is_stale, AlertKind, AlertThresholds,
    Severity, SiteActivity, StockPosition,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn position(site: &str, qty: i64, days_to_expiry: i64) -> StockPosition {
    StockPosition {
        lot_id: 3,
        site_id: 7,
        site_name: site.to_string(),
        reagent_name: "Buffer A".to_string(),
        lot_number: "L-1".to_string(),
        quantity_on_hand: qty,
        recorded_date: today() - Duration::days(2),
        expiration_date: today() + Duration::days(days_to_expiry),
    }
}

fn site(id: i64, name: &str, days_since_count: Option<i64>) -> SiteActivity {
    SiteActivity {
        site_id: id,
        site_name: name.to_string(),
        last_recorded: days_since_count.map(|d| today() - Duration::days(d)),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_expired_beats_low_stock() {
        let alert =
            classify_stock_position(&position("North", 2, -1), today(), &AlertThresholds::default())
                .unwrap();
        assert_eq!(alert.kind, AlertKind::Expired);
        assert_eq!(alert.id, "expired_3_7");
    }

    #[test]
    fn test_expiring_window_is_inclusive() {
        let thresholds = AlertThresholds::default();
        let on_edge = classify_stock_position(&position("North", 50, 30), today(), &thresholds);
        assert_eq!(on_edge.map(|a| a.kind), Some(AlertKind::ExpiringSoon));

        let past_edge = classify_stock_position(&position("North", 50, 31), today(), &thresholds);
        assert!(past_edge.is_none());

        let expires_today = classify_stock_position(&position("North", 50, 0), today(), &thresholds);
        assert_eq!(expires_today.map(|a| a.kind), Some(AlertKind::ExpiringSoon));
    }

    #[test]
    fn test_low_stock_threshold_is_exclusive() {
        let thresholds = AlertThresholds::default();
        let low = classify_stock_position(&position("North", 4, 90), today(), &thresholds);
        assert_eq!(low.map(|a| a.kind), Some(AlertKind::LowStock));

        let enough = classify_stock_position(&position("North", 5, 90), today(), &thresholds);
        assert!(enough.is_none());
    }

    #[test]
    fn test_empty_stock_never_alerts() {
        let thresholds = AlertThresholds::default();
        for days in [-10, 0, 10, 90] {
            assert!(classify_stock_position(&position("North", 0, days), today(), &thresholds)
                .is_none());
        }
    }

    #[test]
    fn test_stale_sites() {
        let thresholds = AlertThresholds::default();
        assert!(is_stale(None, today(), &thresholds));
        assert!(!is_stale(Some(today() - Duration::days(30)), today(), &thresholds));
        assert!(is_stale(Some(today() - Duration::days(31)), today(), &thresholds));
    }

    #[test]
    fn test_collect_orders_by_severity_then_site() {
        let alerts = collect_risk_alerts(
            &[
                position("west", 3, 90),
                position("East", 10, 5),
                position("Central", 10, -3),
            ],
            &[site(1, "Annex", None), site(2, "Main", Some(1))],
            today(),
            &AlertThresholds::default(),
        );

        let summary: Vec<(Severity, &str)> = alerts
            .iter()
            .map(|a| (a.severity, a.site_name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Severity::Error, "Central"),
                (Severity::Warning, "East"),
                (Severity::Warning, "west"),
                (Severity::Info, "Annex"),
            ]
        );
        assert_eq!(alerts[3].id, "no_recent_1");
    }

    #[test]
    fn test_alert_json_shape() {
        let alert =
            classify_stock_position(&position("North", 2, 90), today(), &AlertThresholds::default())
                .unwrap();
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "low_stock");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["last_quantity"], 2);
        assert!(json.get("expiration_date").is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn site_name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z]{1,8}"
    }

    fn position_strategy() -> impl Strategy<Value = StockPosition> {
        (site_name_strategy(), -5i64..200, -60i64..120)
            .prop_map(|(name, qty, days)| position(&name, qty, days))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// An alert is raised only for stock on hand, and its severity
        /// follows its kind
        #[test]
        fn prop_alert_requires_stock(p in position_strategy()) {
            let alert = classify_stock_position(&p, today(), &AlertThresholds::default());
            if p.quantity_on_hand <= 0 {
                prop_assert!(alert.is_none());
            }
            if let Some(alert) = alert {
                prop_assert_eq!(alert.severity, alert.kind.severity());
                prop_assert_eq!(alert.last_quantity, Some(p.quantity_on_hand));
            }
        }

        /// Expired stock is always reported as expired
        #[test]
        fn prop_expired_stock_flagged(qty in 1i64..200, days in -365i64..0) {
            let alert = classify_stock_position(
                &position("North", qty, days),
                today(),
                &AlertThresholds::default(),
            );
            prop_assert_eq!(alert.map(|a| a.kind), Some(AlertKind::Expired));
        }

        /// Collected alerts are sorted by severity, then site name
        #[test]
        fn prop_alerts_sorted(
            positions in prop::collection::vec(position_strategy(), 0..12),
            stale_days in prop::collection::vec(prop::option::of(0i64..90), 0..5)
        ) {
            let sites: Vec<SiteActivity> = stale_days
                .iter()
                .enumerate()
                .map(|(i, d)| site(i as i64, &format!("Site{}", i), *d))
                .collect();
            let alerts = collect_risk_alerts(&positions, &sites, today(), &AlertThresholds::default());

            for pair in alerts.windows(2) {
                let a = (pair[0].severity, pair[0].site_name.to_lowercase());
                let b = (pair[1].severity, pair[1].site_name.to_lowercase());
                prop_assert!(a <= b);
            }

            let stale = sites
                .iter()
                .filter(|s| is_stale(s.last_recorded, today(), &AlertThresholds::default()))
                .count();
            let no_recent = alerts
                .iter()
                .filter(|a| a.kind == AlertKind::NoRecentInventory)
                .count();
            prop_assert_eq!(no_recent, stale);
        }
    }
}
