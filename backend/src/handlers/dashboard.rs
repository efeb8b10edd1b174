//! HTTP handler for the dashboard

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::reporting::resolve_as_of;
use crate::error::AppResult;
use crate::services::dashboard::Dashboard;
use crate::services::DashboardService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub as_of: Option<String>,
}

/// Get dashboard stats and risk alerts
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<Dashboard>> {
    let today = resolve_as_of(query.as_of.as_deref())?;
    let thresholds = state.config.alerts.thresholds()?;

    let service = DashboardService::new(state.db);
    let dashboard = service.dashboard(today, &thresholds).await?;
    Ok(Json(dashboard))
}
