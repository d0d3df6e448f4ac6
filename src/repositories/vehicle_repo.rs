use anyhow::anyhow;
use sqlx::{query, PgPool, Row};
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::vehicle::{Vehicle, VehicleData};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::postgres::PgRow) -> Result<Vehicle> {
        Ok(Vehicle {
            id: row.try_get("id")?,
            license_plate: row.try_get("license_plate")?,
            manufacturer: row.try_get("manufacturer")?,
            model: row.try_get("model")?,
            year: row.try_get("year")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>> {
        let row = query(
            "SELECT id, license_plate, manufacturer, model, year, created_at FROM vehicles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    pub async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>> {
        let row = query(
            "SELECT id, license_plate, manufacturer, model, year, created_at FROM vehicles WHERE license_plate = $1",
        )
        .bind(license_plate)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    /// Get-or-create keyed by normalized plate. Two concurrent first uses of
    /// the same plate are resolved by the unique constraint: the loser's
    /// insert affects no row and the winner's row is re-read.
    pub async fn get_or_create(&self, data: &VehicleData) -> Result<Vehicle> {
        let inserted = query(
            r#"
            INSERT INTO vehicles (license_plate, manufacturer, model, year)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (license_plate) DO NOTHING
            RETURNING id, license_plate, manufacturer, model, year, created_at
            "#,
        )
        .bind(&data.license_plate)
        .bind(&data.manufacturer)
        .bind(&data.model)
        .bind(data.year)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Self::map_row(&row);
        }

        self.find_by_plate(&data.license_plate)
            .await?
            .ok_or_else(|| anyhow!("vehicle {} vanished between insert and re-read", data.license_plate).into())
    }
}
