//! Inventory snapshot models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A physical stock count of a lot at a site.
///
/// Snapshots are authoritative: the flow replay resets its running
/// inventory to `quantity_on_hand` whenever one is encountered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryRecord {
    pub id: i64,
    pub lot_id: i64,
    pub site_id: i64,
    pub quantity_on_hand: i64,
    pub recorded_date: NaiveDate,
    pub recorded_by: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Snapshot joined with site, lot and reagent names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryRecordDetails {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub site_name: String,
    pub lot_number: String,
    pub reagent_name: String,
    pub expiration_date: NaiveDate,
}
