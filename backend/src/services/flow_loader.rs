//! Event loader for cumulative-flow reports
//!
//! Fetches one report scope's history, cut off at the "view as of" date, as
//! plain [`EventStreams`] for the pure reconstruction in `shared::flow`.
//! Dates are read back as text so rows with malformed dates reach the merge
//! step, which drops and counts them. The cutoff compares calendar days via
//! SQLite's `date()`, so timestamp-form rows on the cutoff day are kept.

use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use shared::flow::{aggregate_all_sites, AggregatedStreams, EventStreams, LotWideRows, RawEvent};
use shared::models::lot_label;
use shared::ReportScope;

/// Loads flow events for a report scope
#[derive(Clone)]
pub struct EventLoader {
    db: SqlitePool,
}

/// Events for one scope plus the title they were labelled with
#[derive(Debug, Clone)]
pub struct ScopedEvents {
    pub title: String,
    pub streams: EventStreams,
    /// Rows discarded before the merge (all-sites aggregation only)
    pub dropped: usize,
}

#[derive(Debug, FromRow)]
struct EventRow {
    date: Option<String>,
    quantity: i64,
}

#[derive(Debug, FromRow)]
struct LotLabelRow {
    lot_number: String,
    reagent_name: String,
}

impl EventRow {
    fn into_event(self, label: &str) -> RawEvent {
        RawEvent {
            date: self.date,
            quantity: self.quantity,
            label: label.to_string(),
        }
    }
}

fn into_events(rows: Vec<EventRow>, label: &str) -> Vec<RawEvent> {
    rows.into_iter().map(|row| row.into_event(label)).collect()
}

impl EventLoader {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Load the events of `scope` dated on or before `cutoff`
    pub async fn load(&self, scope: ReportScope, cutoff: NaiveDate) -> AppResult<ScopedEvents> {
        let lot = self.lot_label(scope.lot_id()).await?;

        match scope {
            ReportScope::Site { site_id, lot_id } => {
                let site_name = self.site_name(site_id).await?;
                let title = format!("{} @ {}", lot, site_name);
                let streams = self.load_site(lot_id, site_id, cutoff, &title).await?;
                Ok(ScopedEvents {
                    title,
                    streams,
                    dropped: 0,
                })
            }
            ReportScope::AllSites { lot_id } => {
                let title = format!("{} (All Sites)", lot);
                let aggregated = self.load_all_sites(lot_id, cutoff, &title).await?;
                if aggregated.dropped > 0 {
                    tracing::warn!(
                        lot_id,
                        undated = aggregated.dropped,
                        "Skipping rows with unreadable dates"
                    );
                }
                Ok(ScopedEvents {
                    title,
                    streams: aggregated.streams,
                    dropped: aggregated.dropped,
                })
            }
        }
    }

    async fn lot_label(&self, lot_id: i64) -> AppResult<String> {
        let row = sqlx::query_as::<_, LotLabelRow>(
            r#"
            SELECT l.lot_number, r.name AS reagent_name
            FROM lots l
            JOIN reagents r ON l.reagent_id = r.id
            WHERE l.id = ?
            "#,
        )
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        Ok(lot_label(&row.reagent_name, &row.lot_number))
    }

    async fn site_name(&self, site_id: i64) -> AppResult<String> {
        sqlx::query_scalar::<_, String>("SELECT name FROM sites WHERE id = ?")
            .bind(site_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Site".to_string()))
    }

    async fn load_site(
        &self,
        lot_id: i64,
        site_id: i64,
        cutoff: NaiveDate,
        label: &str,
    ) -> AppResult<EventStreams> {
        let shipments = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(received_date AS TEXT) AS date, quantity
            FROM shipments
            WHERE lot_id = ? AND site_id = ?
              AND received_date IS NOT NULL
              AND (date(received_date) IS NULL OR date(received_date) <= ?)
            ORDER BY received_date, id
            "#,
        )
        .bind(lot_id)
        .bind(site_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let transfers_in = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(transfer_date AS TEXT) AS date, quantity
            FROM transfers
            WHERE lot_id = ? AND to_site_id = ?
              AND (date(transfer_date) IS NULL OR date(transfer_date) <= ?)
            ORDER BY transfer_date, id
            "#,
        )
        .bind(lot_id)
        .bind(site_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let transfers_out = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(transfer_date AS TEXT) AS date, -quantity AS quantity
            FROM transfers
            WHERE lot_id = ? AND from_site_id = ?
              AND (date(transfer_date) IS NULL OR date(transfer_date) <= ?)
            ORDER BY transfer_date, id
            "#,
        )
        .bind(lot_id)
        .bind(site_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let snapshots = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(recorded_date AS TEXT) AS date, quantity_on_hand AS quantity
            FROM inventory_records
            WHERE lot_id = ? AND site_id = ?
              AND (date(recorded_date) IS NULL OR date(recorded_date) <= ?)
            ORDER BY recorded_date, id
            "#,
        )
        .bind(lot_id)
        .bind(site_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        Ok(EventStreams {
            shipments: into_events(shipments, label),
            transfers_in: into_events(transfers_in, label),
            transfers_out: into_events(transfers_out, label),
            snapshots: into_events(snapshots, label),
        })
    }

    async fn load_all_sites(
        &self,
        lot_id: i64,
        cutoff: NaiveDate,
        label: &str,
    ) -> AppResult<AggregatedStreams> {
        let shipments = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(received_date AS TEXT) AS date, quantity
            FROM shipments
            WHERE lot_id = ? AND received_date IS NOT NULL
              AND (date(received_date) IS NULL OR date(received_date) <= ?)
            ORDER BY received_date, id
            "#,
        )
        .bind(lot_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let transfers = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(transfer_date AS TEXT) AS date, quantity
            FROM transfers
            WHERE lot_id = ?
              AND (date(transfer_date) IS NULL OR date(transfer_date) <= ?)
            ORDER BY transfer_date, id
            "#,
        )
        .bind(lot_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let snapshots = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT CAST(recorded_date AS TEXT) AS date, quantity_on_hand AS quantity
            FROM inventory_records
            WHERE lot_id = ?
              AND (date(recorded_date) IS NULL OR date(recorded_date) <= ?)
            ORDER BY recorded_date, id
            "#,
        )
        .bind(lot_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let rows = LotWideRows {
            shipments: into_events(shipments, label),
            transfers: into_events(transfers, label),
            snapshots: into_events(snapshots, label),
        };

        Ok(aggregate_all_sites(rows, label))
    }
}
