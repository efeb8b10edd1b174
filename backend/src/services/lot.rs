//! Lot management service

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Lot, LotWithReagent};
use shared::{validate_name, MAX_LOT_NUMBER_LEN};

#[derive(Clone)]
pub struct LotService {
    db: SqlitePool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLotInput {
    #[validate(length(min = 1, max = 100))]
    pub lot_number: String,
    pub reagent_id: i64,
    pub expiration_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLotInput {
    #[validate(length(min = 1, max = 100))]
    pub lot_number: Option<String>,
    pub reagent_id: Option<i64>,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, FromRow)]
struct LotRow {
    id: i64,
    lot_number: String,
    reagent_id: i64,
    expiration_date: NaiveDate,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, FromRow)]
struct LotWithReagentRow {
    #[sqlx(flatten)]
    lot: LotRow,
    reagent_name: String,
}

impl From<LotRow> for Lot {
    fn from(row: LotRow) -> Self {
        Lot {
            id: row.id,
            lot_number: row.lot_number,
            reagent_id: row.reagent_id,
            expiration_date: row.expiration_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<LotWithReagentRow> for LotWithReagent {
    fn from(row: LotWithReagentRow) -> Self {
        LotWithReagent {
            lot: row.lot.into(),
            reagent_name: row.reagent_name,
        }
    }
}

impl LotService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List lots with reagent names, soonest expiry first
    pub async fn list_lots(&self, reagent_id: Option<i64>) -> AppResult<Vec<LotWithReagent>> {
        let rows = sqlx::query_as::<_, LotWithReagentRow>(
            r#"
            SELECT l.id, l.lot_number, l.reagent_id, l.expiration_date,
                   l.created_at, l.updated_at, r.name AS reagent_name
            FROM lots l
            JOIN reagents r ON l.reagent_id = r.id
            WHERE (?1 IS NULL OR l.reagent_id = ?1)
            ORDER BY l.expiration_date, r.name, l.lot_number
            "#,
        )
        .bind(reagent_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(LotWithReagent::from).collect())
    }

    pub async fn get_lot(&self, lot_id: i64) -> AppResult<LotWithReagent> {
        let row = sqlx::query_as::<_, LotWithReagentRow>(
            r#"
            SELECT l.id, l.lot_number, l.reagent_id, l.expiration_date,
                   l.created_at, l.updated_at, r.name AS reagent_name
            FROM lots l
            JOIN reagents r ON l.reagent_id = r.id
            WHERE l.id = ?
            "#,
        )
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        Ok(row.into())
    }

    pub async fn create_lot(&self, input: CreateLotInput) -> AppResult<Lot> {
        input.validate()?;
        validate_name("lot_number", &input.lot_number, MAX_LOT_NUMBER_LEN)?;

        let row = sqlx::query_as::<_, LotRow>(
            r#"
            INSERT INTO lots (lot_number, reagent_id, expiration_date)
            VALUES (?, ?, ?)
            RETURNING id, lot_number, reagent_id, expiration_date, created_at, updated_at
            "#,
        )
        .bind(input.lot_number.trim())
        .bind(input.reagent_id)
        .bind(input.expiration_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "lot"))?;

        tracing::info!(lot_id = row.id, "Created lot {}", row.lot_number);
        Ok(row.into())
    }

    pub async fn update_lot(&self, lot_id: i64, input: UpdateLotInput) -> AppResult<Lot> {
        input.validate()?;
        let existing = self.get_lot(lot_id).await?.lot;

        let lot_number = input.lot_number.unwrap_or(existing.lot_number);
        validate_name("lot_number", &lot_number, MAX_LOT_NUMBER_LEN)?;

        let row = sqlx::query_as::<_, LotRow>(
            r#"
            UPDATE lots
            SET lot_number = ?, reagent_id = ?, expiration_date = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING id, lot_number, reagent_id, expiration_date, created_at, updated_at
            "#,
        )
        .bind(lot_number.trim())
        .bind(input.reagent_id.unwrap_or(existing.reagent_id))
        .bind(input.expiration_date.unwrap_or(existing.expiration_date))
        .bind(lot_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "lot"))?;

        Ok(row.into())
    }

    /// Delete a lot that has no shipments, transfers or counts
    pub async fn delete_lot(&self, lot_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM lots WHERE id = ?")
            .bind(lot_id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_delete(e, "Lot"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Lot".to_string()));
        }

        Ok(())
    }
}
