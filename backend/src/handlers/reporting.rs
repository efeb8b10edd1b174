//! HTTP handlers for cumulative-flow reports

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::ReportingService;
use crate::AppState;
use shared::{parse_calendar_date, ReportScope};

#[derive(Debug, Deserialize)]
pub struct FlowReportQuery {
    pub lot_id: Option<i64>,
    /// Omitted or 0 means all sites
    pub site_id: Option<i64>,
    pub as_of: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

/// Resolve an optional "view as of" date, defaulting to today (UTC)
pub(super) fn resolve_as_of(raw: Option<&str>) -> AppResult<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => parse_calendar_date(raw)
            .ok_or_else(|| AppError::invalid("as_of", "as_of must be a date (YYYY-MM-DD)")),
    }
}

/// Get the cumulative-flow report for a lot
pub async fn get_flow_report(
    State(state): State<AppState>,
    Query(query): Query<FlowReportQuery>,
) -> AppResult<Response> {
    let lot_id = query
        .lot_id
        .ok_or_else(|| AppError::invalid("lot_id", "lot_id is required"))?;
    let site_id = query.site_id.filter(|id| *id > 0);
    let as_of = resolve_as_of(query.as_of.as_deref())?;

    let service = ReportingService::new(state.db);
    let view = service
        .flow_report(ReportScope::new(lot_id, site_id), as_of)
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&view.report.data_points)?;
        let disposition = format!("attachment; filename=\"flow_lot_{}.csv\"", lot_id);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(view).into_response())
    }
}
