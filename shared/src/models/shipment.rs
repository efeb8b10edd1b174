//! Shipment models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A shipment of a lot to a site.
///
/// A shipment only enters the flow history once `received_date` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shipment {
    pub id: i64,
    pub lot_id: i64,
    pub site_id: i64,
    pub quantity: i64,
    pub shipped_date: NaiveDate,
    pub received_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Shipment joined with site, lot and reagent names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipmentDetails {
    #[serde(flatten)]
    pub shipment: Shipment,
    pub site_name: String,
    pub lot_number: String,
    pub reagent_name: String,
}

impl Shipment {
    pub fn is_received(&self) -> bool {
        self.received_date.is_some()
    }
}
