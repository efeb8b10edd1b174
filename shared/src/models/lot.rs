//! Lot models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A manufactured batch of a reagent, identified by lot number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lot {
    pub id: i64,
    pub lot_number: String,
    pub reagent_id: i64,
    pub expiration_date: NaiveDate,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Lot joined with its reagent name for list views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LotWithReagent {
    #[serde(flatten)]
    pub lot: Lot,
    pub reagent_name: String,
}

impl Lot {
    /// Whole days from `today` until expiration; negative once expired
    pub fn days_until_expiration(&self, today: NaiveDate) -> i64 {
        (self.expiration_date - today).num_days()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.days_until_expiration(today) < 0
    }
}

/// Human-readable lot label, e.g. "Buffer A - L-1001"
pub fn lot_label(reagent_name: &str, lot_number: &str) -> String {
    format!("{} - {}", reagent_name, lot_number)
}
