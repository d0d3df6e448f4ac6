use sqlx::{query, PgPool, Row};
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::user::{CreateUserRequest, User};

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::postgres::PgRow) -> Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub async fn create(&self, request: &CreateUserRequest, password_hash: &str) -> Result<User> {
        let row = query(
            r#"
            INSERT INTO users (email, password_hash, name, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, phone, role, created_at, updated_at
            "#,
        )
        .bind(&request.email)
        .bind(password_hash)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(request.role)
        .fetch_one(&self.pool)
        .await?;

        Self::map_row(&row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = query(
            "SELECT id, email, password_hash, name, phone, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = query(
            "SELECT id, email, password_hash, name, phone, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let row = query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) as exists")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get::<bool, _>("exists").unwrap_or(false))
    }
}
