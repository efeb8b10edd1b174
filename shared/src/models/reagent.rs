//! Reagent models

use serde::{Deserialize, Serialize};

/// A reagent product; stock is tracked per lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reagent {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
