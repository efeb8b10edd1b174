//! WebAssembly module for the Reagent Inventory Tracker
//!
//! Lets the web UI rebuild flow charts and evaluate stock alerts client-side
//! with the same code the server uses. Values cross the boundary as JSON.

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use shared::alerts::{self, AlertThresholds, StockPosition};
use shared::flow::{self, DataPoint, EventStreams, FlowReport};
use shared::parse_calendar_date;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn parse_today(today: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(today).ok_or_else(|| format!("Invalid date: {}", today))
}

fn reconstruct_report(streams_json: &str) -> Result<FlowReport, String> {
    let streams: EventStreams = serde_json::from_str(streams_json)
        .map_err(|e| format!("Invalid event streams JSON: {}", e))?;
    Ok(flow::reconstruct(streams))
}

fn stats_json(points_json: &str) -> Result<Option<String>, String> {
    let points: Vec<DataPoint> = serde_json::from_str(points_json)
        .map_err(|e| format!("Invalid data points JSON: {}", e))?;

    flow::usage_stats(&points)
        .map(|stats| serde_json::to_string(&stats).map_err(|e| e.to_string()))
        .transpose()
}

fn classify_json(position_json: &str, today: &str) -> Result<Option<String>, String> {
    let position: StockPosition = serde_json::from_str(position_json)
        .map_err(|e| format!("Invalid stock position JSON: {}", e))?;
    let today = parse_today(today)?;

    alerts::classify_stock_position(&position, today, &AlertThresholds::default())
        .map(|alert| serde_json::to_string(&alert).map_err(|e| e.to_string()))
        .transpose()
}

/// Rebuild a cumulative-flow report from event streams JSON
#[wasm_bindgen]
pub fn reconstruct_flow(streams_json: &str) -> Result<String, JsValue> {
    let report = reconstruct_report(streams_json).map_err(to_js_error)?;

    if report.dropped_events > 0 {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "reconstruct_flow: skipped {} event(s) without a readable date",
            report.dropped_events
        )));
    }

    serde_json::to_string(&report).map_err(|e| to_js_error(e.to_string()))
}

/// Usage statistics for a data point series; `undefined` when empty
#[wasm_bindgen]
pub fn usage_stats(points_json: &str) -> Result<Option<String>, JsValue> {
    stats_json(points_json).map_err(to_js_error)
}

/// Risk alert for one stock position as of `today`, if any
#[wasm_bindgen]
pub fn classify_stock_position(position_json: &str, today: &str) -> Result<Option<String>, JsValue> {
    classify_json(position_json, today).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_report_from_json() {
        let json = r#"{
            "shipments": [
                {"date": "2024-01-01", "quantity": 50, "label": "Buffer A - L-1 @ North"},
                {"date": "2024-03-01", "quantity": 50, "label": "Buffer A - L-1 @ North"}
            ],
            "snapshots": [{"date": "2024-02-01", "quantity": 40}]
        }"#;

        let report = reconstruct_report(json).unwrap();
        assert_eq!(report.data_points.len(), 3);
        assert_eq!(report.data_points[2].current_inventory, 90);
        assert_eq!(report.stats.unwrap().projected_days_remaining, 540);
    }

    #[test]
    fn test_reconstruct_report_counts_dropped() {
        let json = r#"{"shipments": [{"date": null, "quantity": 5}, {"date": "2024-01-01", "quantity": 5}]}"#;
        let report = reconstruct_report(json).unwrap();
        assert_eq!(report.dropped_events, 1);
        assert_eq!(report.data_points.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(reconstruct_report("not json").is_err());
        assert!(stats_json("{}").is_err());
    }

    #[test]
    fn test_stats_of_empty_series() {
        assert_eq!(stats_json("[]").unwrap(), None);
    }

    #[test]
    fn test_stats_round_trip_through_points() {
        let report = reconstruct_report(
            r#"{"shipments": [{"date": "2024-01-01", "quantity": 50}],
                "snapshots": [{"date": "2024-01-11", "quantity": 30}]}"#,
        )
        .unwrap();
        let points = serde_json::to_string(&report.data_points).unwrap();

        let stats: serde_json::Value =
            serde_json::from_str(&stats_json(&points).unwrap().unwrap()).unwrap();
        assert_eq!(stats["total_consumed"], 20);
        assert_eq!(stats["days_of_data"], 10);
        assert_eq!(stats["projected_days_remaining"], 15);
    }

    #[test]
    fn test_classify_position() {
        let position = r#"{
            "lot_id": 1, "site_id": 2, "site_name": "North", "reagent_name": "Buffer A",
            "lot_number": "L-1", "quantity_on_hand": 3,
            "recorded_date": "2024-05-30", "expiration_date": "2025-01-01"
        }"#;

        let alert: serde_json::Value =
            serde_json::from_str(&classify_json(position, "2024-06-01").unwrap().unwrap()).unwrap();
        assert_eq!(alert["type"], "low_stock");
        assert_eq!(alert["id"], "low_stock_1_2");

        assert!(classify_json(position, "June 1st").is_err());
    }
}
