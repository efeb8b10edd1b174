//! Shipment service
//!
//! A shipment only counts toward a site's flow history once it has a
//! received date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{Shipment, ShipmentDetails};
use shared::{validate_positive_quantity, validate_shipment_dates};

#[derive(Clone)]
pub struct ShipmentService {
    db: SqlitePool,
}

#[derive(Debug, Deserialize)]
pub struct CreateShipmentInput {
    pub lot_id: i64,
    pub site_id: i64,
    pub quantity: i64,
    pub shipped_date: NaiveDate,
    pub received_date: Option<NaiveDate>,
}

/// Full replacement of a shipment's fields
pub type UpdateShipmentInput = CreateShipmentInput;

/// Optional list filters
#[derive(Debug, Default, Deserialize)]
pub struct ShipmentFilter {
    pub lot_id: Option<i64>,
    pub site_id: Option<i64>,
}

#[derive(Debug, FromRow)]
struct ShipmentRow {
    id: i64,
    lot_id: i64,
    site_id: i64,
    quantity: i64,
    shipped_date: NaiveDate,
    received_date: Option<NaiveDate>,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, FromRow)]
struct ShipmentDetailsRow {
    #[sqlx(flatten)]
    shipment: ShipmentRow,
    site_name: String,
    lot_number: String,
    reagent_name: String,
}

impl From<ShipmentRow> for Shipment {
    fn from(row: ShipmentRow) -> Self {
        Shipment {
            id: row.id,
            lot_id: row.lot_id,
            site_id: row.site_id,
            quantity: row.quantity,
            shipped_date: row.shipped_date,
            received_date: row.received_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<ShipmentDetailsRow> for ShipmentDetails {
    fn from(row: ShipmentDetailsRow) -> Self {
        ShipmentDetails {
            shipment: row.shipment.into(),
            site_name: row.site_name,
            lot_number: row.lot_number,
            reagent_name: row.reagent_name,
        }
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT sh.id, sh.lot_id, sh.site_id, sh.quantity, sh.shipped_date, sh.received_date,
           sh.created_at, sh.updated_at,
           s.name AS site_name, l.lot_number, r.name AS reagent_name
    FROM shipments sh
    JOIN sites s ON sh.site_id = s.id
    JOIN lots l ON sh.lot_id = l.id
    JOIN reagents r ON l.reagent_id = r.id
"#;

impl CreateShipmentInput {
    fn check(&self) -> AppResult<()> {
        validate_positive_quantity("quantity", self.quantity)?;
        validate_shipment_dates(self.shipped_date, self.received_date)?;
        Ok(())
    }
}

impl ShipmentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List shipments, newest first
    pub async fn list_shipments(&self, filter: ShipmentFilter) -> AppResult<Vec<ShipmentDetails>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR sh.lot_id = ?1) AND (?2 IS NULL OR sh.site_id = ?2) \
             ORDER BY sh.shipped_date DESC, sh.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ShipmentDetailsRow>(&sql)
            .bind(filter.lot_id)
            .bind(filter.site_id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ShipmentDetails::from).collect())
    }

    pub async fn get_shipment(&self, shipment_id: i64) -> AppResult<ShipmentDetails> {
        let sql = format!("{} WHERE sh.id = ?", DETAILS_SELECT);
        let row = sqlx::query_as::<_, ShipmentDetailsRow>(&sql)
            .bind(shipment_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Shipment".to_string()))?;

        Ok(row.into())
    }

    pub async fn create_shipment(&self, input: CreateShipmentInput) -> AppResult<Shipment> {
        input.check()?;

        let row = sqlx::query_as::<_, ShipmentRow>(
            r#"
            INSERT INTO shipments (lot_id, site_id, quantity, shipped_date, received_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, lot_id, site_id, quantity, shipped_date, received_date,
                      created_at, updated_at
            "#,
        )
        .bind(input.lot_id)
        .bind(input.site_id)
        .bind(input.quantity)
        .bind(input.shipped_date)
        .bind(input.received_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "shipment"))?;

        tracing::info!(
            shipment_id = row.id,
            lot_id = row.lot_id,
            site_id = row.site_id,
            "Recorded shipment of {} units",
            row.quantity
        );
        Ok(row.into())
    }

    pub async fn update_shipment(
        &self,
        shipment_id: i64,
        input: UpdateShipmentInput,
    ) -> AppResult<Shipment> {
        input.check()?;

        let row = sqlx::query_as::<_, ShipmentRow>(
            r#"
            UPDATE shipments
            SET lot_id = ?, site_id = ?, quantity = ?, shipped_date = ?, received_date = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING id, lot_id, site_id, quantity, shipped_date, received_date,
                      created_at, updated_at
            "#,
        )
        .bind(input.lot_id)
        .bind(input.site_id)
        .bind(input.quantity)
        .bind(input.shipped_date)
        .bind(input.received_date)
        .bind(shipment_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "shipment"))?
        .ok_or_else(|| AppError::NotFound("Shipment".to_string()))?;

        Ok(row.into())
    }

    pub async fn delete_shipment(&self, shipment_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = ?")
            .bind(shipment_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Shipment".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{date, seed_lot, seed_site, test_pool};

    #[tokio::test]
    async fn test_create_shipment_with_details() {
        let pool = test_pool().await;
        let site_id = seed_site(&pool, "North Lab").await;
        let (_, lot_id) = seed_lot(&pool, "Buffer A", "L-1", "2025-01-01").await;
        let service = ShipmentService::new(pool);

        let shipment = service
            .create_shipment(CreateShipmentInput {
                lot_id,
                site_id,
                quantity: 50,
                shipped_date: date("2024-01-01"),
                received_date: Some(date("2024-01-03")),
            })
            .await
            .unwrap();
        assert!(shipment.is_received());

        let details = service.get_shipment(shipment.id).await.unwrap();
        assert_eq!(details.site_name, "North Lab");
        assert_eq!(details.reagent_name, "Buffer A");
        assert_eq!(details.lot_number, "L-1");

        let filtered = service
            .list_shipments(ShipmentFilter {
                lot_id: Some(lot_id),
                site_id: None,
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_received_before_shipped_rejected() {
        let pool = test_pool().await;
        let site_id = seed_site(&pool, "North Lab").await;
        let (_, lot_id) = seed_lot(&pool, "Buffer A", "L-1", "2025-01-01").await;

        let err = ShipmentService::new(pool)
            .create_shipment(CreateShipmentInput {
                lot_id,
                site_id,
                quantity: 5,
                shipped_date: date("2024-01-05"),
                received_date: Some(date("2024-01-03")),
            })
            .await
            .unwrap_err();

        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "received_date"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_shipment() {
        let pool = test_pool().await;
        let site_id = seed_site(&pool, "North Lab").await;
        let (_, lot_id) = seed_lot(&pool, "Buffer A", "L-1", "2025-01-01").await;

        let err = ShipmentService::new(pool)
            .update_shipment(
                77,
                CreateShipmentInput {
                    lot_id,
                    site_id,
                    quantity: 5,
                    shipped_date: date("2024-01-01"),
                    received_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
