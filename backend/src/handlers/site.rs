//! HTTP handlers for site management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::Site;
use crate::services::site::{CreateSiteInput, UpdateSiteInput};
use crate::services::SiteService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SiteListQuery {
    #[serde(default)]
    pub active_only: bool,
}

/// List sites
pub async fn list_sites(
    State(state): State<AppState>,
    Query(query): Query<SiteListQuery>,
) -> AppResult<Json<Vec<Site>>> {
    let service = SiteService::new(state.db);
    let sites = service.list_sites(query.active_only).await?;
    Ok(Json(sites))
}

/// Get a site by ID
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
) -> AppResult<Json<Site>> {
    let service = SiteService::new(state.db);
    let site = service.get_site(site_id).await?;
    Ok(Json(site))
}

/// Create a site
pub async fn create_site(
    State(state): State<AppState>,
    Json(input): Json<CreateSiteInput>,
) -> AppResult<(StatusCode, Json<Site>)> {
    let service = SiteService::new(state.db);
    let site = service.create_site(input).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// Update a site
pub async fn update_site(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
    Json(input): Json<UpdateSiteInput>,
) -> AppResult<Json<Site>> {
    let service = SiteService::new(state.db);
    let site = service.update_site(site_id, input).await?;
    Ok(Json(site))
}

/// Delete a site
pub async fn delete_site(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = SiteService::new(state.db);
    service.delete_site(site_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
