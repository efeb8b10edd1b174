//! Reagent catalogue service

use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::Reagent;
use shared::{validate_name, MAX_NAME_LEN};

#[derive(Clone)]
pub struct ReagentService {
    db: SqlitePool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReagentInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReagentInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, FromRow)]
struct ReagentRow {
    id: i64,
    name: String,
    description: Option<String>,
}

impl From<ReagentRow> for Reagent {
    fn from(row: ReagentRow) -> Self {
        Reagent {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

impl ReagentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_reagents(&self) -> AppResult<Vec<Reagent>> {
        let rows = sqlx::query_as::<_, ReagentRow>(
            "SELECT id, name, description FROM reagents ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Reagent::from).collect())
    }

    pub async fn get_reagent(&self, reagent_id: i64) -> AppResult<Reagent> {
        let row = sqlx::query_as::<_, ReagentRow>(
            "SELECT id, name, description FROM reagents WHERE id = ?",
        )
        .bind(reagent_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Reagent".to_string()))?;

        Ok(row.into())
    }

    pub async fn create_reagent(&self, input: CreateReagentInput) -> AppResult<Reagent> {
        input.validate()?;
        validate_name("name", &input.name, MAX_NAME_LEN)?;

        let row = sqlx::query_as::<_, ReagentRow>(
            r#"
            INSERT INTO reagents (name, description)
            VALUES (?, ?)
            RETURNING id, name, description
            "#,
        )
        .bind(input.name.trim())
        .bind(input.description.filter(|d| !d.trim().is_empty()))
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "reagent"))?;

        tracing::info!(reagent_id = row.id, "Created reagent {}", row.name);
        Ok(row.into())
    }

    pub async fn update_reagent(
        &self,
        reagent_id: i64,
        input: UpdateReagentInput,
    ) -> AppResult<Reagent> {
        input.validate()?;
        let existing = self.get_reagent(reagent_id).await?;

        let name = input.name.unwrap_or(existing.name);
        validate_name("name", &name, MAX_NAME_LEN)?;
        let description = match input.description {
            Some(d) if d.trim().is_empty() => None,
            Some(d) => Some(d),
            None => existing.description,
        };

        let row = sqlx::query_as::<_, ReagentRow>(
            r#"
            UPDATE reagents
            SET name = ?, description = ?
            WHERE id = ?
            RETURNING id, name, description
            "#,
        )
        .bind(name.trim())
        .bind(description)
        .bind(reagent_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "reagent"))?;

        Ok(row.into())
    }

    /// Delete a reagent that has no lots
    pub async fn delete_reagent(&self, reagent_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reagents WHERE id = ?")
            .bind(reagent_id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_delete(e, "Reagent"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Reagent".to_string()));
        }

        Ok(())
    }
}
