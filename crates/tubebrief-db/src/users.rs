//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use tubebrief_core::{Error, Result, User, UserIdentity, UserRepository};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_user_row(row: sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            oauth_refresh_token: row.get("oauth_refresh_token"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, identity: &UserIdentity) -> Result<User> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, true, $5, $5)
             ON CONFLICT (email) DO UPDATE
                SET first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                    last_name = COALESCE(EXCLUDED.last_name, users.last_name),
                    updated_at = EXCLUDED.updated_at
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&identity.email)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_user_row(row))
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_user_row))
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_user_row))
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE users SET oauth_refresh_token = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
