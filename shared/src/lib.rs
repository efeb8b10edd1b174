//! Shared types and models for the Reagent Inventory Tracker
//!
//! This crate contains the domain models, the cumulative-flow reconstruction
//! used by reports, and the risk-alert rules used by the dashboard. It is
//! shared between the backend and the web UI (via WASM).

pub mod alerts;
pub mod flow;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
