//! HTTP handlers for shipment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::{Shipment, ShipmentDetails};
use crate::services::shipment::{CreateShipmentInput, ShipmentFilter, UpdateShipmentInput};
use crate::services::ShipmentService;
use crate::AppState;

/// List shipments, optionally filtered by lot and site
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(filter): Query<ShipmentFilter>,
) -> AppResult<Json<Vec<ShipmentDetails>>> {
    let service = ShipmentService::new(state.db);
    let shipments = service.list_shipments(filter).await?;
    Ok(Json(shipments))
}

pub async fn get_shipment(
    State(state): State<AppState>,
    Path(shipment_id): Path<i64>,
) -> AppResult<Json<ShipmentDetails>> {
    let service = ShipmentService::new(state.db);
    let shipment = service.get_shipment(shipment_id).await?;
    Ok(Json(shipment))
}

/// Record a shipment
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(input): Json<CreateShipmentInput>,
) -> AppResult<(StatusCode, Json<Shipment>)> {
    let service = ShipmentService::new(state.db);
    let shipment = service.create_shipment(input).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// Update a shipment, e.g. to mark it received
pub async fn update_shipment(
    State(state): State<AppState>,
    Path(shipment_id): Path<i64>,
    Json(input): Json<UpdateShipmentInput>,
) -> AppResult<Json<Shipment>> {
    let service = ShipmentService::new(state.db);
    let shipment = service.update_shipment(shipment_id, input).await?;
    Ok(Json(shipment))
}

pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(shipment_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = ShipmentService::new(state.db);
    service.delete_shipment(shipment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
