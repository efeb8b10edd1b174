//! Domain models for the Reagent Inventory Tracker

mod inventory;
mod lot;
mod reagent;
mod shipment;
mod site;
mod transfer;

pub use inventory::*;
pub use lot::*;
pub use reagent::*;
pub use shipment::*;
pub use site::*;
pub use transfer::*;
