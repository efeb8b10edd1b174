//! HTTP handlers for reagent endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::Reagent;
use crate::services::reagent::{CreateReagentInput, UpdateReagentInput};
use crate::services::ReagentService;
use crate::AppState;

pub async fn list_reagents(State(state): State<AppState>) -> AppResult<Json<Vec<Reagent>>> {
    let service = ReagentService::new(state.db);
    Ok(Json(service.list_reagents().await?))
}

pub async fn get_reagent(
    State(state): State<AppState>,
    Path(reagent_id): Path<i64>,
) -> AppResult<Json<Reagent>> {
    let service = ReagentService::new(state.db);
    Ok(Json(service.get_reagent(reagent_id).await?))
}

pub async fn create_reagent(
    State(state): State<AppState>,
    Json(input): Json<CreateReagentInput>,
) -> AppResult<(StatusCode, Json<Reagent>)> {
    let service = ReagentService::new(state.db);
    let reagent = service.create_reagent(input).await?;
    Ok((StatusCode::CREATED, Json(reagent)))
}

pub async fn update_reagent(
    State(state): State<AppState>,
    Path(reagent_id): Path<i64>,
    Json(input): Json<UpdateReagentInput>,
) -> AppResult<Json<Reagent>> {
    let service = ReagentService::new(state.db);
    Ok(Json(service.update_reagent(reagent_id, input).await?))
}

pub async fn delete_reagent(
    State(state): State<AppState>,
    Path(reagent_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = ReagentService::new(state.db);
    service.delete_reagent(reagent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
