//! Route definitions for the Reagent Inventory Tracker

use axum::{
    routing::{delete, get},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Master data
        .nest("/sites", site_routes())
        .nest("/reagents", reagent_routes())
        .nest("/lots", lot_routes())
        // Stock movements
        .nest("/shipments", shipment_routes())
        .nest("/transfers", transfer_routes())
        .nest("/inventory-records", inventory_routes())
        // Reporting
        .route("/reports/flow", get(handlers::get_flow_report))
        .route("/dashboard", get(handlers::get_dashboard))
}

/// Site management routes
fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sites).post(handlers::create_site))
        .route(
            "/:site_id",
            get(handlers::get_site)
                .put(handlers::update_site)
                .delete(handlers::delete_site),
        )
}

/// Reagent management routes
fn reagent_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_reagents).post(handlers::create_reagent))
        .route(
            "/:reagent_id",
            get(handlers::get_reagent)
                .put(handlers::update_reagent)
                .delete(handlers::delete_reagent),
        )
}

/// Lot management routes
fn lot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_lots).post(handlers::create_lot))
        .route(
            "/:lot_id",
            get(handlers::get_lot)
                .put(handlers::update_lot)
                .delete(handlers::delete_lot),
        )
}

/// Shipment routes
fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_shipments).post(handlers::create_shipment))
        .route(
            "/:shipment_id",
            get(handlers::get_shipment)
                .put(handlers::update_shipment)
                .delete(handlers::delete_shipment),
        )
}

/// Transfer routes
fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transfers).post(handlers::create_transfer))
        .route(
            "/:transfer_id",
            get(handlers::get_transfer)
                .put(handlers::update_transfer)
                .delete(handlers::delete_transfer),
        )
}

/// Inventory snapshot routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inventory_records).post(handlers::create_inventory_record),
        )
        .route("/:record_id", delete(handlers::delete_inventory_record))
}
