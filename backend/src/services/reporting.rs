//! Reporting service for cumulative-flow reports

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::services::flow_loader::EventLoader;
use shared::flow::{self, FlowReport};
use shared::ReportScope;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    loader: EventLoader,
}

/// A flow report together with the scope and date it was built for
#[derive(Debug, Clone, Serialize)]
pub struct FlowReportView {
    pub scope: ReportScope,
    pub as_of: NaiveDate,
    pub title: String,
    #[serde(flatten)]
    pub report: FlowReport,
}

impl ReportingService {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            loader: EventLoader::new(db),
        }
    }

    /// Rebuild the cumulative-flow series for `scope` as of `as_of`
    pub async fn flow_report(&self, scope: ReportScope, as_of: NaiveDate) -> AppResult<FlowReportView> {
        tracing::debug!(?scope, %as_of, "Building flow report");

        let loaded = self.loader.load(scope, as_of).await?;
        let event_count = loaded.streams.len() + loaded.dropped;
        let mut report = flow::reconstruct(loaded.streams);
        report.dropped_events += loaded.dropped;

        if report.dropped_events > 0 {
            tracing::warn!(
                ?scope,
                dropped = report.dropped_events,
                "Dropped events without a readable date"
            );
        }
        tracing::info!(
            ?scope,
            events = event_count,
            points = report.data_points.len(),
            "Flow report ready"
        );

        Ok(FlowReportView {
            scope,
            as_of,
            title: loaded.title,
            report,
        })
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
