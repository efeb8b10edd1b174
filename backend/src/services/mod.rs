//! Business logic services for the Reagent Inventory Tracker

pub mod dashboard;
pub mod flow_loader;
pub mod inventory;
pub mod lot;
pub mod reagent;
pub mod reporting;
pub mod shipment;
pub mod site;
pub mod transfer;

pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use lot::LotService;
pub use reagent::ReagentService;
pub use reporting::ReportingService;
pub use shipment::ShipmentService;
pub use site::SiteService;
pub use transfer::TransferService;
