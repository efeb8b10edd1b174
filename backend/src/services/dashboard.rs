//! Dashboard service: headline counts and risk alerts

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::AppResult;
use shared::alerts::{
    collect_risk_alerts, is_stale, AlertKind, AlertThresholds, RiskAlert, SiteActivity,
    StockPosition,
};
use shared::parse_calendar_date;

#[derive(Clone)]
pub struct DashboardService {
    db: SqlitePool,
}

/// Headline counts shown above the alert list
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_sites: i64,
    pub total_lots: i64,
    pub expired_lots: i64,
    pub expiring_soon_lots: i64,
    pub sites_without_recent_inventory: i64,
    pub sites_with_low_stock: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub stats: DashboardStats,
    pub alerts: Vec<RiskAlert>,
}

#[derive(Debug, FromRow)]
struct StockPositionRow {
    lot_id: i64,
    site_id: i64,
    site_name: String,
    reagent_name: String,
    lot_number: String,
    quantity_on_hand: i64,
    recorded_date: NaiveDate,
    expiration_date: NaiveDate,
}

impl From<StockPositionRow> for StockPosition {
    fn from(row: StockPositionRow) -> Self {
        StockPosition {
            lot_id: row.lot_id,
            site_id: row.site_id,
            site_name: row.site_name,
            reagent_name: row.reagent_name,
            lot_number: row.lot_number,
            quantity_on_hand: row.quantity_on_hand,
            recorded_date: row.recorded_date,
            expiration_date: row.expiration_date,
        }
    }
}

#[derive(Debug, FromRow)]
struct SiteActivityRow {
    site_id: i64,
    site_name: String,
    last_recorded: Option<String>,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Build the dashboard as it looked on `today`
    pub async fn dashboard(
        &self,
        today: NaiveDate,
        thresholds: &AlertThresholds,
    ) -> AppResult<Dashboard> {
        let positions = self.latest_positions(today).await?;
        let activity = self.site_activity(today).await?;
        let alerts = collect_risk_alerts(&positions, &activity, today, thresholds);

        let mut stats = self.lot_counts(today, thresholds).await?;
        stats.total_sites = activity.len() as i64;
        stats.sites_without_recent_inventory = activity
            .iter()
            .filter(|site| is_stale(site.last_recorded, today, thresholds))
            .count() as i64;
        stats.sites_with_low_stock = alerts
            .iter()
            .filter(|alert| alert.kind == AlertKind::LowStock)
            .map(|alert| alert.site_name.as_str())
            .collect::<BTreeSet<_>>()
            .len() as i64;

        tracing::debug!(%today, alerts = alerts.len(), "Dashboard built");

        Ok(Dashboard {
            as_of: today,
            stats,
            alerts,
        })
    }

    /// Latest count on or before `today` of every lot at every active site.
    ///
    /// Count dates are compared as calendar days, so a timestamp-form row
    /// still counts on the day it was taken.
    async fn latest_positions(&self, today: NaiveDate) -> AppResult<Vec<StockPosition>> {
        let rows = sqlx::query_as::<_, StockPositionRow>(
            r#"
            SELECT ir.lot_id, ir.site_id, s.name AS site_name, r.name AS reagent_name,
                   l.lot_number, ir.quantity_on_hand,
                   date(ir.recorded_date) AS recorded_date, l.expiration_date
            FROM inventory_records ir
            JOIN sites s ON ir.site_id = s.id
            JOIN lots l ON ir.lot_id = l.id
            JOIN reagents r ON l.reagent_id = r.id
            WHERE s.is_active = 1
              AND ir.id = (
                  SELECT ir2.id
                  FROM inventory_records ir2
                  WHERE ir2.lot_id = ir.lot_id
                    AND ir2.site_id = ir.site_id
                    AND date(ir2.recorded_date) <= ?1
                  ORDER BY date(ir2.recorded_date) DESC, ir2.id DESC
                  LIMIT 1
              )
            ORDER BY s.name, r.name, l.lot_number
            "#,
        )
        .bind(today)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockPosition::from).collect())
    }

    /// Most recent count date of each active site
    async fn site_activity(&self, today: NaiveDate) -> AppResult<Vec<SiteActivity>> {
        let rows = sqlx::query_as::<_, SiteActivityRow>(
            r#"
            SELECT s.id AS site_id, s.name AS site_name,
                   MAX(date(ir.recorded_date)) AS last_recorded
            FROM sites s
            LEFT JOIN inventory_records ir
                   ON ir.site_id = s.id AND date(ir.recorded_date) <= ?1
            WHERE s.is_active = 1
            GROUP BY s.id, s.name
            ORDER BY s.name
            "#,
        )
        .bind(today)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SiteActivity {
                site_id: row.site_id,
                site_name: row.site_name,
                last_recorded: row.last_recorded.as_deref().and_then(parse_calendar_date),
            })
            .collect())
    }

    async fn lot_counts(
        &self,
        today: NaiveDate,
        thresholds: &AlertThresholds,
    ) -> AppResult<DashboardStats> {
        let horizon = today + Duration::days(thresholds.expiring_soon_days);

        let (total_lots, expired_lots, expiring_soon_lots): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN expiration_date < ?1 THEN 1 ELSE 0 END), 0),
                   COALESCE(SUM(CASE WHEN expiration_date >= ?1 AND expiration_date <= ?2
                                     THEN 1 ELSE 0 END), 0)
            FROM lots
            "#,
        )
        .bind(today)
        .bind(horizon)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardStats {
            total_lots,
            expired_lots,
            expiring_soon_lots,
            ..Default::default()
        })
    }
}
