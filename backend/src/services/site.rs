//! Site management service

use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::Site;
use shared::{validate_name, MAX_NAME_LEN};

/// Site service for managing laboratory sites
#[derive(Clone)]
pub struct SiteService {
    db: SqlitePool,
}

/// Input for creating a site
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSiteInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for updating a site
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSiteInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, FromRow)]
struct SiteRow {
    id: i64,
    name: String,
    location: Option<String>,
    is_active: bool,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

impl From<SiteRow> for Site {
    fn from(row: SiteRow) -> Self {
        Site {
            id: row.id,
            name: row.name,
            location: row.location,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Blank optional text is stored as NULL
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SiteService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List sites ordered by name
    pub async fn list_sites(&self, active_only: bool) -> AppResult<Vec<Site>> {
        let rows = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, name, location, is_active, created_at, updated_at
            FROM sites
            WHERE (? = 0 OR is_active = 1)
            ORDER BY name
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Site::from).collect())
    }

    /// Get a site by ID
    pub async fn get_site(&self, site_id: i64) -> AppResult<Site> {
        let row = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, name, location, is_active, created_at, updated_at
            FROM sites
            WHERE id = ?
            "#,
        )
        .bind(site_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Site".to_string()))?;

        Ok(row.into())
    }

    /// Create a new site
    pub async fn create_site(&self, input: CreateSiteInput) -> AppResult<Site> {
        input.validate()?;
        validate_name("name", &input.name, MAX_NAME_LEN)?;

        let row = sqlx::query_as::<_, SiteRow>(
            r#"
            INSERT INTO sites (name, location, is_active)
            VALUES (?, ?, ?)
            RETURNING id, name, location, is_active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize_optional(input.location))
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "site"))?;

        tracing::info!(site_id = row.id, "Created site {}", row.name);
        Ok(row.into())
    }

    /// Update a site; absent fields keep their current value
    pub async fn update_site(&self, site_id: i64, input: UpdateSiteInput) -> AppResult<Site> {
        input.validate()?;
        let existing = self.get_site(site_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name("name", &name, MAX_NAME_LEN)?;
        let location = match input.location {
            Some(location) => normalize_optional(Some(location)),
            None => existing.location,
        };
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let row = sqlx::query_as::<_, SiteRow>(
            r#"
            UPDATE sites
            SET name = ?, location = ?, is_active = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING id, name, location, is_active, created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(location)
        .bind(is_active)
        .bind(site_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "site"))?;

        Ok(row.into())
    }

    /// Delete a site that has no history
    pub async fn delete_site(&self, site_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sites WHERE id = ?")
            .bind(site_id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_delete(e, "Site"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Site".to_string()));
        }

        Ok(())
    }
}
