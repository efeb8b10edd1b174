//! Database models for the Reagent Inventory Tracker
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
