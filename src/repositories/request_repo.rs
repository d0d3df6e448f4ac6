use sqlx::{query, PgPool, Row};
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::request::{PartsRequest, RequestStatus};

pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::postgres::PgRow) -> Result<PartsRequest> {
        let parts: serde_json::Value = row.try_get("parts")?;
        Ok(PartsRequest {
            id: row.try_get("id")?,
            garage_id: row.try_get("garage_id")?,
            vehicle_id: row.try_get("vehicle_id")?,
            parts: serde_json::from_value(parts)?,
            description: row.try_get("description")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub async fn create(
        &self,
        garage_id: Uuid,
        vehicle_id: Uuid,
        parts: &[String],
        description: Option<&str>,
    ) -> Result<PartsRequest> {
        let row = query(
            r#"
            INSERT INTO requests (garage_id, vehicle_id, parts, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, garage_id, vehicle_id, parts, description, status, created_at, updated_at
            "#,
        )
        .bind(garage_id)
        .bind(vehicle_id)
        .bind(serde_json::to_value(parts)?)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Self::map_row(&row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PartsRequest>> {
        let row = query(
            "SELECT id, garage_id, vehicle_id, parts, description, status, created_at, updated_at FROM requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    pub async fn list_for_garage(&self, garage_id: Uuid) -> Result<Vec<PartsRequest>> {
        let rows = query(
            "SELECT id, garage_id, vehicle_id, parts, description, status, created_at, updated_at
             FROM requests WHERE garage_id = $1 ORDER BY created_at DESC",
        )
        .bind(garage_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn list_open(&self) -> Result<Vec<PartsRequest>> {
        let rows = query(
            "SELECT id, garage_id, vehicle_id, parts, description, status, created_at, updated_at
             FROM requests WHERE status = 'open' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn set_status(&self, id: Uuid, status: RequestStatus) -> Result<PartsRequest> {
        let row = query(
            r#"
            UPDATE requests SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING id, garage_id, vehicle_id, parts, description, status, created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Self::map_row(&row)
    }
}
