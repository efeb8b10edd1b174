//! HTTP handlers for transfer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::{Transfer, TransferDetails};
use crate::services::transfer::{CreateTransferInput, TransferFilter, UpdateTransferInput};
use crate::services::TransferService;
use crate::AppState;

pub async fn list_transfers(
    State(state): State<AppState>,
    Query(filter): Query<TransferFilter>,
) -> AppResult<Json<Vec<TransferDetails>>> {
    let service = TransferService::new(state.db);
    let transfers = service.list_transfers(filter).await?;
    Ok(Json(transfers))
}

pub async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<i64>,
) -> AppResult<Json<TransferDetails>> {
    let service = TransferService::new(state.db);
    let transfer = service.get_transfer(transfer_id).await?;
    Ok(Json(transfer))
}

pub async fn create_transfer(
    State(state): State<AppState>,
    Json(input): Json<CreateTransferInput>,
) -> AppResult<(StatusCode, Json<Transfer>)> {
    let service = TransferService::new(state.db);
    let transfer = service.create_transfer(input).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

pub async fn update_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<i64>,
    Json(input): Json<UpdateTransferInput>,
) -> AppResult<Json<Transfer>> {
    let service = TransferService::new(state.db);
    let transfer = service.update_transfer(transfer_id, input).await?;
    Ok(Json(transfer))
}

pub async fn delete_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = TransferService::new(state.db);
    service.delete_transfer(transfer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
