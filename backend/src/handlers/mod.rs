//! HTTP handlers for the Reagent Inventory Tracker API

mod dashboard;
mod health;
mod inventory;
mod lot;
mod reagent;
mod reporting;
mod shipment;
mod site;
mod transfer;

pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use lot::*;
pub use reagent::*;
pub use reporting::*;
pub use shipment::*;
pub use site::*;
pub use transfer::*;
