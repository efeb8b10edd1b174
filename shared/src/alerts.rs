//! Dashboard risk alerts
//!
//! Rules are evaluated against the latest inventory snapshot of each active
//! site/lot pair, plus the most recent count date of each active site.
//! `today` is always passed in so the rules can be replayed for any date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::format_calendar_date;

/// What a risk alert is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Expired,
    ExpiringSoon,
    LowStock,
    NoRecentInventory,
}

/// Alert severity; ordering is display priority (most severe first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl AlertKind {
    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::Expired => Severity::Error,
            AlertKind::ExpiringSoon | AlertKind::LowStock => Severity::Warning,
            AlertKind::NoRecentInventory => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub site_name: String,
    pub reagent_name: String,
    pub lot_number: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_recorded: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

/// Tunable limits for the alert rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertThresholds {
    /// Lots expiring within this many days are flagged
    pub expiring_soon_days: i64,
    /// On-hand counts strictly below this are low stock
    pub low_stock_threshold: i64,
    /// Sites without a count for longer than this are flagged
    pub stale_inventory_days: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            expiring_soon_days: 30,
            low_stock_threshold: 5,
            stale_inventory_days: 30,
        }
    }
}

/// Latest recorded count of one lot at one site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockPosition {
    pub lot_id: i64,
    pub site_id: i64,
    pub site_name: String,
    pub reagent_name: String,
    pub lot_number: String,
    pub quantity_on_hand: i64,
    pub recorded_date: NaiveDate,
    pub expiration_date: NaiveDate,
}

/// Most recent count date of an active site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteActivity {
    pub site_id: i64,
    pub site_name: String,
    pub last_recorded: Option<NaiveDate>,
}

/// Classify a stock position; at most one alert, highest priority first
pub fn classify_stock_position(
    position: &StockPosition,
    today: NaiveDate,
    thresholds: &AlertThresholds,
) -> Option<RiskAlert> {
    let qty = position.quantity_on_hand;
    if qty <= 0 {
        return None;
    }

    let days_left = (position.expiration_date - today).num_days();
    let (kind, id_prefix, message) = if days_left < 0 {
        (
            AlertKind::Expired,
            "expired",
            format!("Expired {} days ago, still has {} units", -days_left, qty),
        )
    } else if days_left <= thresholds.expiring_soon_days {
        (
            AlertKind::ExpiringSoon,
            "expiring",
            format!("Expires in {} day(s), {} units remaining", days_left, qty),
        )
    } else if qty < thresholds.low_stock_threshold {
        (
            AlertKind::LowStock,
            "low_stock",
            format!("Low stock: only {} units remaining", qty),
        )
    } else {
        return None;
    };

    let is_expiry = kind != AlertKind::LowStock;
    Some(RiskAlert {
        id: format!("{}_{}_{}", id_prefix, position.lot_id, position.site_id),
        kind,
        severity: kind.severity(),
        site_name: position.site_name.clone(),
        reagent_name: position.reagent_name.clone(),
        lot_number: position.lot_number.clone(),
        message,
        last_quantity: Some(qty),
        last_recorded: (!is_expiry).then_some(position.recorded_date),
        expiration_date: is_expiry.then_some(position.expiration_date),
    })
}

/// Whether a site's latest count is missing or too old
pub fn is_stale(last_recorded: Option<NaiveDate>, today: NaiveDate, thresholds: &AlertThresholds) -> bool {
    match last_recorded {
        None => true,
        Some(date) => (today - date).num_days() > thresholds.stale_inventory_days,
    }
}

/// Alert for a site that has not been counted recently
pub fn stale_site_alert(
    site: &SiteActivity,
    today: NaiveDate,
    thresholds: &AlertThresholds,
) -> Option<RiskAlert> {
    if !is_stale(site.last_recorded, today, thresholds) {
        return None;
    }

    let message = match site.last_recorded {
        None => "No inventory has ever been recorded".to_string(),
        Some(date) => format!("Last inventory recorded on {}", format_calendar_date(date)),
    };

    Some(RiskAlert {
        id: format!("no_recent_{}", site.site_id),
        kind: AlertKind::NoRecentInventory,
        severity: Severity::Info,
        site_name: site.site_name.clone(),
        reagent_name: "All reagents".to_string(),
        lot_number: "All lots".to_string(),
        message,
        last_quantity: None,
        last_recorded: site.last_recorded,
        expiration_date: None,
    })
}

/// Order alerts by severity, then site name (case-insensitive)
pub fn sort_alerts(alerts: &mut [RiskAlert]) {
    alerts.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.site_name.to_lowercase().cmp(&b.site_name.to_lowercase()))
    });
}

/// Evaluate every rule and return the sorted alert list
pub fn collect_risk_alerts(
    positions: &[StockPosition],
    sites: &[SiteActivity],
    today: NaiveDate,
    thresholds: &AlertThresholds,
) -> Vec<RiskAlert> {
    let mut alerts: Vec<RiskAlert> = positions
        .iter()
        .filter_map(|p| classify_stock_position(p, today, thresholds))
        .chain(sites.iter().filter_map(|s| stale_site_alert(s, today, thresholds)))
        .collect();

    sort_alerts(&mut alerts);
    alerts
}
