//! Common types used across the tracker

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Calendar date format used on the wire and in the store
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which slice of history a flow report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportScope {
    /// One site's history for one lot
    Site { site_id: i64, lot_id: i64 },
    /// One lot summed across every site
    AllSites { lot_id: i64 },
}

impl ReportScope {
    pub fn new(lot_id: i64, site_id: Option<i64>) -> Self {
        match site_id {
            Some(site_id) => ReportScope::Site { site_id, lot_id },
            None => ReportScope::AllSites { lot_id },
        }
    }

    pub fn lot_id(&self) -> i64 {
        match self {
            ReportScope::Site { lot_id, .. } | ReportScope::AllSites { lot_id } => *lot_id,
        }
    }

    pub fn site_id(&self) -> Option<i64> {
        match self {
            ReportScope::Site { site_id, .. } => Some(*site_id),
            ReportScope::AllSites { .. } => None,
        }
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, ReportScope::AllSites { .. })
    }
}

/// Parse a calendar date as stored by the tracker.
///
/// Accepts `YYYY-MM-DD` and, for rows written by older clients, a full
/// timestamp whose date part is taken. Anything else yields `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.fZ"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Format a date the way the store expects it
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
