//! Processing job queue repository.
//!
//! Durable queue for running the pipeline out-of-band from the request path.
//! Claiming uses `FOR UPDATE SKIP LOCKED` so multiple workers never pick up
//! the same job.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use tubebrief_core::defaults::JOB_MAX_RETRIES;
use tubebrief_core::{Error, JobRepository, JobStatus, ProcessingJob, Result};

/// PostgreSQL implementation of JobRepository.
pub struct PgJobRepository {
    pool: Pool<Postgres>,
}

impl PgJobRepository {
    /// Create a new PgJobRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn job_status_to_str(status: JobStatus) -> &'static str {
        match status {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    fn str_to_job_status(s: &str) -> JobStatus {
        match s {
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    fn parse_job_row(row: sqlx::postgres::PgRow) -> ProcessingJob {
        let status: String = row.get("status");
        ProcessingJob {
            id: row.get("id"),
            user_id: row.get("user_id"),
            video_reference: row.get("video_reference"),
            status: Self::str_to_job_status(&status),
            error_message: row.get("error_message"),
            retry_count: row.get("retry_count"),
            max_retries: row.get("max_retries"),
            created_at: row.get("created_at"),
            started_at: row.get("started_at"),
            completed_at: row.get("completed_at"),
        }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn queue(&self, user_id: Uuid, video_reference: &str) -> Result<Uuid> {
        let job_id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO processing_jobs
                 (id, user_id, video_reference, status, retry_count, max_retries, created_at)
             VALUES ($1, $2, $3, $4, 0, $5, $6)",
        )
        .bind(job_id)
        .bind(user_id)
        .bind(video_reference)
        .bind(Self::job_status_to_str(JobStatus::Pending))
        .bind(JOB_MAX_RETRIES)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(job_id)
    }

    async fn claim_next(&self) -> Result<Option<ProcessingJob>> {
        let row = sqlx::query(
            "UPDATE processing_jobs
             SET status = 'running', started_at = $1
             WHERE id = (
                 SELECT id FROM processing_jobs
                 WHERE status = 'pending'
                 ORDER BY created_at
                 FOR UPDATE SKIP LOCKED
                 LIMIT 1
             )
             RETURNING *",
        )
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_job_row))
    }

    async fn complete(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE processing_jobs
             SET status = 'completed', completed_at = $2, error_message = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn fail(&self, id: Uuid, error: &str, retryable: bool) -> Result<()> {
        // Retryable failures below the budget go back to pending; everything
        // else lands in failed with the message preserved.
        sqlx::query(
            "UPDATE processing_jobs
             SET retry_count = retry_count + 1,
                 error_message = $2,
                 status = CASE
                     WHEN $3 AND retry_count + 1 < max_retries THEN 'pending'
                     ELSE 'failed'
                 END,
                 completed_at = CASE
                     WHEN $3 AND retry_count + 1 < max_retries THEN NULL
                     ELSE $4
                 END
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .bind(retryable)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            let s = PgJobRepository::job_status_to_str(status);
            assert_eq!(PgJobRepository::str_to_job_status(s), status);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_pending() {
        assert_eq!(
            PgJobRepository::str_to_job_status("garbage"),
            JobStatus::Pending
        );
    }
}
