//! Site models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A laboratory site holding reagent stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    /// Inactive sites are hidden from pickers, reports and risk alerts
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
