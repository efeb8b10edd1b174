//! HTTP handlers for inventory snapshot endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::{InventoryRecord, InventoryRecordDetails};
use crate::services::inventory::{InventoryFilter, RecordInventoryInput};
use crate::services::InventoryService;
use crate::AppState;

/// List stock counts
pub async fn list_inventory_records(
    State(state): State<AppState>,
    Query(filter): Query<InventoryFilter>,
) -> AppResult<Json<Vec<InventoryRecordDetails>>> {
    let service = InventoryService::new(state.db);
    let records = service.list_records(filter).await?;
    Ok(Json(records))
}

/// Record a stock count
pub async fn create_inventory_record(
    State(state): State<AppState>,
    Json(input): Json<RecordInventoryInput>,
) -> AppResult<(StatusCode, Json<InventoryRecord>)> {
    let service = InventoryService::new(state.db);
    let record = service.record_inventory(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete a stock count
pub async fn delete_inventory_record(
    State(state): State<AppState>,
    Path(record_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.db);
    service.delete_record(record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
