//! Transfer models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A movement of lot stock from one site to another
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transfer {
    pub id: i64,
    pub lot_id: i64,
    pub from_site_id: i64,
    pub to_site_id: i64,
    pub quantity: i64,
    pub transfer_date: NaiveDate,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Transfer joined with site, lot and reagent names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferDetails {
    #[serde(flatten)]
    pub transfer: Transfer,
    pub from_site_name: String,
    pub to_site_name: String,
    pub lot_number: String,
    pub reagent_name: String,
}
