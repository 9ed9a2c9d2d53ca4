//! Channel subscription repository implementation.
//!
//! Uniqueness of (user_id, external_channel_id) is enforced by a database
//! constraint; `ensure` relies on it for race-free insert-or-fetch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use tubebrief_core::{ChannelSubscription, Error, Result, SubscriptionRepository};

/// PostgreSQL implementation of SubscriptionRepository.
pub struct PgSubscriptionRepository {
    pool: Pool<Postgres>,
}

impl PgSubscriptionRepository {
    /// Create a new PgSubscriptionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_subscription_row(row: sqlx::postgres::PgRow) -> ChannelSubscription {
        ChannelSubscription {
            id: row.get("id"),
            user_id: row.get("user_id"),
            external_channel_id: row.get("external_channel_id"),
            channel_title: row.get("channel_title"),
            last_published_at: row.get("last_published_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find(
        &self,
        user_id: Uuid,
        external_channel_id: &str,
    ) -> Result<Option<ChannelSubscription>> {
        let row = sqlx::query(
            "SELECT * FROM channel_subscriptions
             WHERE user_id = $1 AND external_channel_id = $2",
        )
        .bind(user_id)
        .bind(external_channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_subscription_row))
    }

    async fn ensure(
        &self,
        user_id: Uuid,
        external_channel_id: &str,
        channel_title: &str,
        last_published_at: Option<DateTime<Utc>>,
    ) -> Result<ChannelSubscription> {
        let now = Utc::now();

        // Insert-or-ignore, then read back. A concurrent insert loses the
        // race harmlessly: both callers end up with the same row.
        sqlx::query(
            "INSERT INTO channel_subscriptions
                 (id, user_id, external_channel_id, channel_title, last_published_at,
                  created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             ON CONFLICT (user_id, external_channel_id) DO NOTHING",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(external_channel_id)
        .bind(channel_title)
        .bind(last_published_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let subscription = self
            .find(user_id, external_channel_id)
            .await?
            .ok_or_else(|| {
                Error::Internal(format!(
                    "subscription vanished after upsert: ({}, {})",
                    user_id, external_channel_id
                ))
            })?;

        debug!(
            subsystem = "db",
            component = "subscriptions",
            op = "ensure",
            user_id = %user_id,
            channel_id = external_channel_id,
            "Subscription ensured"
        );
        Ok(subscription)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChannelSubscription>> {
        let rows = sqlx::query(
            "SELECT * FROM channel_subscriptions WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(Self::parse_subscription_row).collect())
    }

    async fn touch_last_published(&self, id: Uuid, published_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE channel_subscriptions
             SET last_published_at = GREATEST(COALESCE(last_published_at, $2), $2),
                 updated_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(published_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM channel_subscriptions WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
