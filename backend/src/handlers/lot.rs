//! HTTP handlers for lot management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{Lot, LotWithReagent};
use crate::services::lot::{CreateLotInput, UpdateLotInput};
use crate::services::LotService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LotListQuery {
    pub reagent_id: Option<i64>,
}

/// List lots with their reagent names
pub async fn list_lots(
    State(state): State<AppState>,
    Query(query): Query<LotListQuery>,
) -> AppResult<Json<Vec<LotWithReagent>>> {
    let service = LotService::new(state.db);
    let lots = service.list_lots(query.reagent_id).await?;
    Ok(Json(lots))
}

/// Get a lot by ID
pub async fn get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<i64>,
) -> AppResult<Json<LotWithReagent>> {
    let service = LotService::new(state.db);
    let lot = service.get_lot(lot_id).await?;
    Ok(Json(lot))
}

/// Create a new lot
pub async fn create_lot(
    State(state): State<AppState>,
    Json(input): Json<CreateLotInput>,
) -> AppResult<(StatusCode, Json<Lot>)> {
    let service = LotService::new(state.db);
    let lot = service.create_lot(input).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// Update a lot
pub async fn update_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<i64>,
    Json(input): Json<UpdateLotInput>,
) -> AppResult<Json<Lot>> {
    let service = LotService::new(state.db);
    let lot = service.update_lot(lot_id, input).await?;
    Ok(Json(lot))
}

/// Delete a lot
pub async fn delete_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = LotService::new(state.db);
    service.delete_lot(lot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
