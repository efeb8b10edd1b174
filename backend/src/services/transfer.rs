//! Site-to-site transfer service

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{Transfer, TransferDetails};
use shared::{validate_positive_quantity, validate_transfer_sites};

#[derive(Clone)]
pub struct TransferService {
    db: SqlitePool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransferInput {
    pub lot_id: i64,
    pub from_site_id: i64,
    pub to_site_id: i64,
    pub quantity: i64,
    pub transfer_date: NaiveDate,
}

/// Full replacement of a transfer's fields
pub type UpdateTransferInput = CreateTransferInput;

/// Optional list filters; `site_id` matches either end of the transfer
#[derive(Debug, Default, Deserialize)]
pub struct TransferFilter {
    pub lot_id: Option<i64>,
    pub site_id: Option<i64>,
}

#[derive(Debug, FromRow)]
struct TransferRow {
    id: i64,
    lot_id: i64,
    from_site_id: i64,
    to_site_id: i64,
    quantity: i64,
    transfer_date: NaiveDate,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, FromRow)]
struct TransferDetailsRow {
    #[sqlx(flatten)]
    transfer: TransferRow,
    from_site_name: String,
    to_site_name: String,
    lot_number: String,
    reagent_name: String,
}

impl From<TransferRow> for Transfer {
    fn from(row: TransferRow) -> Self {
        Transfer {
            id: row.id,
            lot_id: row.lot_id,
            from_site_id: row.from_site_id,
            to_site_id: row.to_site_id,
            quantity: row.quantity,
            transfer_date: row.transfer_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<TransferDetailsRow> for TransferDetails {
    fn from(row: TransferDetailsRow) -> Self {
        TransferDetails {
            transfer: row.transfer.into(),
            from_site_name: row.from_site_name,
            to_site_name: row.to_site_name,
            lot_number: row.lot_number,
            reagent_name: row.reagent_name,
        }
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT t.id, t.lot_id, t.from_site_id, t.to_site_id, t.quantity, t.transfer_date,
           t.created_at, t.updated_at,
           fs.name AS from_site_name, ts.name AS to_site_name,
           l.lot_number, r.name AS reagent_name
    FROM transfers t
    JOIN sites fs ON t.from_site_id = fs.id
    JOIN sites ts ON t.to_site_id = ts.id
    JOIN lots l ON t.lot_id = l.id
    JOIN reagents r ON l.reagent_id = r.id
"#;

impl CreateTransferInput {
    fn check(&self) -> AppResult<()> {
        validate_positive_quantity("quantity", self.quantity)?;
        validate_transfer_sites(self.from_site_id, self.to_site_id)?;
        Ok(())
    }
}

impl TransferService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List transfers, newest first
    pub async fn list_transfers(&self, filter: TransferFilter) -> AppResult<Vec<TransferDetails>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR t.lot_id = ?1) \
             AND (?2 IS NULL OR t.from_site_id = ?2 OR t.to_site_id = ?2) \
             ORDER BY t.transfer_date DESC, t.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, TransferDetailsRow>(&sql)
            .bind(filter.lot_id)
            .bind(filter.site_id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(TransferDetails::from).collect())
    }

    pub async fn get_transfer(&self, transfer_id: i64) -> AppResult<TransferDetails> {
        let sql = format!("{} WHERE t.id = ?", DETAILS_SELECT);
        let row = sqlx::query_as::<_, TransferDetailsRow>(&sql)
            .bind(transfer_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Transfer".to_string()))?;

        Ok(row.into())
    }

    pub async fn create_transfer(&self, input: CreateTransferInput) -> AppResult<Transfer> {
        input.check()?;

        let row = sqlx::query_as::<_, TransferRow>(
            r#"
            INSERT INTO transfers (lot_id, from_site_id, to_site_id, quantity, transfer_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, lot_id, from_site_id, to_site_id, quantity, transfer_date,
                      created_at, updated_at
            "#,
        )
        .bind(input.lot_id)
        .bind(input.from_site_id)
        .bind(input.to_site_id)
        .bind(input.quantity)
        .bind(input.transfer_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "transfer"))?;

        tracing::info!(
            transfer_id = row.id,
            lot_id = row.lot_id,
            "Transferred {} units from site {} to site {}",
            row.quantity,
            row.from_site_id,
            row.to_site_id
        );
        Ok(row.into())
    }

    pub async fn update_transfer(
        &self,
        transfer_id: i64,
        input: UpdateTransferInput,
    ) -> AppResult<Transfer> {
        input.check()?;

        let row = sqlx::query_as::<_, TransferRow>(
            r#"
            UPDATE transfers
            SET lot_id = ?, from_site_id = ?, to_site_id = ?, quantity = ?, transfer_date = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING id, lot_id, from_site_id, to_site_id, quantity, transfer_date,
                      created_at, updated_at
            "#,
        )
        .bind(input.lot_id)
        .bind(input.from_site_id)
        .bind(input.to_site_id)
        .bind(input.quantity)
        .bind(input.transfer_date)
        .bind(transfer_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "transfer"))?
        .ok_or_else(|| AppError::NotFound("Transfer".to_string()))?;

        Ok(row.into())
    }

    pub async fn delete_transfer(&self, transfer_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transfers WHERE id = ?")
            .bind(transfer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transfer".to_string()));
        }

        Ok(())
    }
}
