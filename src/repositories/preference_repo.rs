use sqlx::{query, PgPool, Row};
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::preference::{SupplierPreference, UpdatePreferencesRequest};
use crate::models::user::UserRole;

pub struct PreferenceRepository {
    pool: PgPool,
}

impl PreferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::postgres::PgRow) -> Result<SupplierPreference> {
        Ok(SupplierPreference {
            id: row.try_get("id")?,
            supplier_id: row.try_get("supplier_id")?,
            manufacturers: row.try_get("manufacturers")?,
            models: row.try_get("models")?,
            regions: row.try_get("regions")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub async fn find_by_supplier(&self, supplier_id: Uuid) -> Result<Option<SupplierPreference>> {
        let row = query(
            "SELECT id, supplier_id, manufacturers, models, regions, created_at, updated_at
             FROM supplier_preferences WHERE supplier_id = $1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    /// Registration hook: a supplier starts with an unconfigured record,
    /// which matches everything.
    pub async fn create_empty(&self, supplier_id: Uuid) -> Result<()> {
        query(
            "INSERT INTO supplier_preferences (supplier_id) VALUES ($1) ON CONFLICT (supplier_id) DO NOTHING",
        )
        .bind(supplier_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert(
        &self,
        supplier_id: Uuid,
        request: &UpdatePreferencesRequest,
    ) -> Result<SupplierPreference> {
        let manufacturers = request
            .manufacturers
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let models = request.models.as_ref().map(serde_json::to_string).transpose()?;
        let regions = request.regions.as_ref().map(serde_json::to_string).transpose()?;

        let row = query(
            r#"
            INSERT INTO supplier_preferences (supplier_id, manufacturers, models, regions)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (supplier_id) DO UPDATE SET
                manufacturers = COALESCE(EXCLUDED.manufacturers, supplier_preferences.manufacturers),
                models = COALESCE(EXCLUDED.models, supplier_preferences.models),
                regions = COALESCE(EXCLUDED.regions, supplier_preferences.regions),
                updated_at = CURRENT_TIMESTAMP
            RETURNING id, supplier_id, manufacturers, models, regions, created_at, updated_at
            "#,
        )
        .bind(supplier_id)
        .bind(manufacturers)
        .bind(models)
        .bind(regions)
        .fetch_one(&self.pool)
        .await?;

        Self::map_row(&row)
    }

    /// Full supplier population with their (possibly absent) preference
    /// records, for the matcher's scan.
    pub async fn load_supplier_population(
        &self,
    ) -> Result<Vec<(Uuid, Option<SupplierPreference>)>> {
        let rows = query(
            r#"
            SELECT u.id as user_id,
                   p.id, p.supplier_id, p.manufacturers, p.models, p.regions,
                   p.created_at, p.updated_at
            FROM users u
            LEFT JOIN supplier_preferences p ON p.supplier_id = u.id
            WHERE u.role = $1
            "#,
        )
        .bind(UserRole::Supplier)
        .fetch_all(&self.pool)
        .await?;

        let mut population = Vec::new();
        for row in rows {
            let user_id: Uuid = row.try_get("user_id")?;
            let preference = match row.try_get::<Option<Uuid>, _>("id")? {
                Some(_) => Some(Self::map_row(&row)?),
                None => None,
            };
            population.push((user_id, preference));
        }

        Ok(population)
    }
}
