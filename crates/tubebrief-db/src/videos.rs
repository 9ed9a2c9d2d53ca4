//! Video record repository implementation.
//!
//! One row per (external_video_id, channel_id); the unique constraint makes
//! the orchestrator's upsert-then-check sequence race-free.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use tubebrief_core::{
    Error, NewVideoRecord, ProcessingOutcome, Result, VideoRecord, VideoRepository,
};

/// PostgreSQL implementation of VideoRepository.
pub struct PgVideoRepository {
    pool: Pool<Postgres>,
}

impl PgVideoRepository {
    /// Create a new PgVideoRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_video_row(row: sqlx::postgres::PgRow) -> VideoRecord {
        VideoRecord {
            id: row.get("id"),
            external_video_id: row.get("external_video_id"),
            channel_id: row.get("channel_id"),
            title: row.get("title"),
            description: row.get("description"),
            published_at: row.get("published_at"),
            transcript: row.get("transcript"),
            summary_json: row.get("summary_json"),
            mindmap_url: row.get("mindmap_url"),
            mp3_url: row.get("mp3_url"),
            processed_at: row.get("processed_at"),
            sent_at: row.get("sent_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn find(&self, external_video_id: &str, channel_id: Uuid) -> Result<Option<VideoRecord>> {
        let row = sqlx::query(
            "SELECT * FROM videos WHERE external_video_id = $1 AND channel_id = $2",
        )
        .bind(external_video_id)
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_video_row))
    }

    async fn insert_or_fetch(&self, new: NewVideoRecord) -> Result<VideoRecord> {
        let now = Utc::now();

        // A unique-constraint conflict means a concurrent invocation created
        // the record first; re-read and resume instead of failing.
        sqlx::query(
            "INSERT INTO videos
                 (id, external_video_id, channel_id, title, description, published_at,
                  created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             ON CONFLICT (external_video_id, channel_id) DO NOTHING",
        )
        .bind(Uuid::now_v7())
        .bind(&new.external_video_id)
        .bind(new.channel_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.published_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.find(&new.external_video_id, new.channel_id)
            .await?
            .ok_or_else(|| {
                Error::Internal(format!(
                    "video record vanished after upsert: ({}, {})",
                    new.external_video_id, new.channel_id
                ))
            })
    }

    async fn finalize(&self, id: Uuid, outcome: ProcessingOutcome) -> Result<VideoRecord> {
        let row = sqlx::query(
            "UPDATE videos
             SET transcript = $2,
                 summary_json = $3,
                 mindmap_url = $4,
                 mp3_url = $5,
                 processed_at = $6,
                 updated_at = $7
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&outcome.transcript)
        .bind(&outcome.summary_json)
        .bind(&outcome.mindmap_url)
        .bind(&outcome.mp3_url)
        .bind(outcome.processed_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_video_row(row))
    }

    async fn list_for_channel(
        &self,
        channel_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM videos WHERE channel_id = $1
             ORDER BY published_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(channel_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(Self::parse_video_row).collect())
    }
}
