use rust_decimal::Decimal;
use sqlx::{query, PgPool, Row};
use uuid::Uuid;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::offer::{Offer, OfferLineItem, OfferStatus};

pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::postgres::PgRow) -> Result<Offer> {
        let items: serde_json::Value = row.try_get("items")?;
        Ok(Offer {
            id: row.try_get("id")?,
            request_id: row.try_get("request_id")?,
            supplier_id: row.try_get("supplier_id")?,
            items: serde_json::from_value(items)?,
            total_price: row.try_get("total_price")?,
            notes: row.try_get("notes")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub async fn create(
        &self,
        request_id: Uuid,
        supplier_id: Uuid,
        items: &[OfferLineItem],
        total_price: Decimal,
        notes: Option<&str>,
    ) -> Result<Offer> {
        let result = query(
            r#"
            INSERT INTO offers (request_id, supplier_id, items, total_price, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, request_id, supplier_id, items, total_price, notes, status, created_at
            "#,
        )
        .bind(request_id)
        .bind(supplier_id)
        .bind(serde_json::to_value(items)?)
        .bind(total_price)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Self::map_row(&row),
            // the (request_id, supplier_id) constraint: a concurrent
            // duplicate submission gets the same answer as the exists check
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(AppError::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>> {
        let row = query(
            "SELECT id, request_id, supplier_id, items, total_price, notes, status, created_at FROM offers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    pub async fn list_for_supplier(&self, supplier_id: Uuid) -> Result<Vec<Offer>> {
        let rows = query(
            "SELECT id, request_id, supplier_id, items, total_price, notes, status, created_at
             FROM offers WHERE supplier_id = $1 ORDER BY created_at DESC",
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn list_for_request(&self, request_id: Uuid) -> Result<Vec<Offer>> {
        let rows = query(
            "SELECT id, request_id, supplier_id, items, total_price, notes, status, created_at
             FROM offers WHERE request_id = $1 ORDER BY created_at DESC",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn list_for_request_by_supplier(
        &self,
        request_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<Vec<Offer>> {
        let rows = query(
            "SELECT id, request_id, supplier_id, items, total_price, notes, status, created_at
             FROM offers WHERE request_id = $1 AND supplier_id = $2 ORDER BY created_at DESC",
        )
        .bind(request_id)
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn exists_for(&self, request_id: Uuid, supplier_id: Uuid) -> Result<bool> {
        let row = query(
            "SELECT EXISTS(SELECT 1 FROM offers WHERE request_id = $1 AND supplier_id = $2) as exists",
        )
        .bind(request_id)
        .bind(supplier_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get::<bool, _>("exists").unwrap_or(false))
    }

    pub async fn set_status(&self, id: Uuid, status: OfferStatus) -> Result<Offer> {
        let row = query(
            r#"
            UPDATE offers SET status = $1
            WHERE id = $2
            RETURNING id, request_id, supplier_id, items, total_price, notes, status, created_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Self::map_row(&row)
    }
}
