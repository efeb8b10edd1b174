//! Inventory snapshot service
//!
//! Snapshots are physical counts. They are append-only: a wrong count is
//! deleted and recorded again.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{InventoryRecord, InventoryRecordDetails};
use shared::{validate_on_hand_quantity, validate_recorded_by};

#[derive(Clone)]
pub struct InventoryService {
    db: SqlitePool,
}

/// Input for recording a stock count
#[derive(Debug, Deserialize, Validate)]
pub struct RecordInventoryInput {
    pub lot_id: i64,
    pub site_id: i64,
    pub quantity_on_hand: i64,
    pub recorded_date: NaiveDate,
    #[validate(length(min = 1, max = 200))]
    pub recorded_by: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryFilter {
    pub lot_id: Option<i64>,
    pub site_id: Option<i64>,
}

#[derive(Debug, FromRow)]
struct InventoryRecordRow {
    id: i64,
    lot_id: i64,
    site_id: i64,
    quantity_on_hand: i64,
    recorded_date: NaiveDate,
    recorded_by: String,
    created_at: Option<NaiveDateTime>,
}

#[derive(Debug, FromRow)]
struct InventoryRecordDetailsRow {
    #[sqlx(flatten)]
    record: InventoryRecordRow,
    site_name: String,
    lot_number: String,
    reagent_name: String,
    expiration_date: NaiveDate,
}

impl From<InventoryRecordRow> for InventoryRecord {
    fn from(row: InventoryRecordRow) -> Self {
        InventoryRecord {
            id: row.id,
            lot_id: row.lot_id,
            site_id: row.site_id,
            quantity_on_hand: row.quantity_on_hand,
            recorded_date: row.recorded_date,
            recorded_by: row.recorded_by,
            created_at: row.created_at,
        }
    }
}

impl From<InventoryRecordDetailsRow> for InventoryRecordDetails {
    fn from(row: InventoryRecordDetailsRow) -> Self {
        InventoryRecordDetails {
            record: row.record.into(),
            site_name: row.site_name,
            lot_number: row.lot_number,
            reagent_name: row.reagent_name,
            expiration_date: row.expiration_date,
        }
    }
}

impl InventoryService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List counts, most recent first
    pub async fn list_records(
        &self,
        filter: InventoryFilter,
    ) -> AppResult<Vec<InventoryRecordDetails>> {
        let rows = sqlx::query_as::<_, InventoryRecordDetailsRow>(
            r#"
            SELECT ir.id, ir.lot_id, ir.site_id, ir.quantity_on_hand, ir.recorded_date,
                   ir.recorded_by, ir.created_at,
                   s.name AS site_name, l.lot_number, r.name AS reagent_name,
                   l.expiration_date
            FROM inventory_records ir
            JOIN sites s ON ir.site_id = s.id
            JOIN lots l ON ir.lot_id = l.id
            JOIN reagents r ON l.reagent_id = r.id
            WHERE (?1 IS NULL OR ir.lot_id = ?1) AND (?2 IS NULL OR ir.site_id = ?2)
            ORDER BY ir.recorded_date DESC, ir.id DESC
            "#,
        )
        .bind(filter.lot_id)
        .bind(filter.site_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryRecordDetails::from).collect())
    }

    /// Record a stock count
    pub async fn record_inventory(&self, input: RecordInventoryInput) -> AppResult<InventoryRecord> {
        validate_recorded_by(&input.recorded_by)?;
        validate_on_hand_quantity(input.quantity_on_hand)?;
        input.validate()?;

        let row = sqlx::query_as::<_, InventoryRecordRow>(
            r#"
            INSERT INTO inventory_records
                (lot_id, site_id, quantity_on_hand, recorded_date, recorded_by)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, lot_id, site_id, quantity_on_hand, recorded_date, recorded_by,
                      created_at
            "#,
        )
        .bind(input.lot_id)
        .bind(input.site_id)
        .bind(input.quantity_on_hand)
        .bind(input.recorded_date)
        .bind(input.recorded_by.trim())
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "inventory record"))?;

        tracing::info!(
            record_id = row.id,
            lot_id = row.lot_id,
            site_id = row.site_id,
            "Recorded count of {} on hand",
            row.quantity_on_hand
        );
        Ok(row.into())
    }

    pub async fn delete_record(&self, record_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_records WHERE id = ?")
            .bind(record_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory record".to_string()));
        }

        Ok(())
    }
}
