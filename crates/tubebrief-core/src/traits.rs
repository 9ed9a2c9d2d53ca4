//! Core traits for tubebrief abstractions.
//!
//! These traits define the capability interfaces the processing pipeline
//! depends on, enabling pluggable backends and testability. The external
//! platform, the generation backends, and the store are all collaborators
//! behind these seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::resolve::ChannelLookup;

// =============================================================================
// METADATA GATEWAY
// =============================================================================

/// Read access to the external video platform.
///
/// `Ok(None)` means the upstream confirmed absence (not retryable);
/// `Err(Error::Gateway)` means the upstream call itself failed (retry-eligible
/// by the caller or queue layer). Callers must keep the two apart.
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Fetch channel metadata using the lookup strategy chosen from the
    /// resolved identifier's shape.
    async fn fetch_channel(&self, lookup: &ChannelLookup) -> Result<Option<ChannelMetadata>>;

    /// Fetch video metadata by canonical external video ID.
    async fn fetch_video(&self, external_video_id: &str) -> Result<Option<VideoMetadata>>;

    /// Fetch the full transcript text. `Ok(None)` when captions do not exist.
    async fn fetch_transcript(&self, external_video_id: &str) -> Result<Option<String>>;
}

// =============================================================================
// ARTIFACT GENERATOR
// =============================================================================

/// Summary and artifact generation.
///
/// `summarize` never fails outright: internal trouble yields a degraded
/// summary carrying [`crate::models::DEGRADED_SUMMARY_POINT`]. The render
/// operations are independent, order-insensitive, and best-effort: `None`
/// on any rendering or storage failure, never a propagated error.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    /// Derive a structured summary from a transcript.
    async fn summarize(&self, transcript: &str, title: &str) -> StructuredSummary;

    /// Render a mind-map image from the summary and store it.
    /// Returns the artifact URL, or `None` on failure.
    async fn render_mindmap(&self, summary: &StructuredSummary) -> Option<String>;

    /// Synthesize an audio narration of the summary and store it.
    /// Returns the artifact URL, or `None` on failure.
    async fn render_audio(&self, summary: &StructuredSummary) -> Option<String>;
}

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user on first login, or update profile fields in place.
    /// Keyed by unique email.
    async fn upsert(&self, identity: &UserIdentity) -> Result<User>;

    /// Fetch a user by ID.
    async fn fetch(&self, id: Uuid) -> Result<Option<User>>;

    /// Fetch a user by email.
    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Store or replace the external-auth refresh credential.
    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<()>;
}

// =============================================================================
// SUBSCRIPTION REPOSITORY
// =============================================================================

/// Repository for channel subscriptions.
///
/// Uniqueness invariant: one row per (user_id, external_channel_id). `ensure`
/// provides insert-or-fetch-existing-on-conflict semantics so concurrent
/// callers never produce a duplicate.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Fetch the subscription tying a user to an external channel.
    async fn find(
        &self,
        user_id: Uuid,
        external_channel_id: &str,
    ) -> Result<Option<ChannelSubscription>>;

    /// Create the subscription if absent, or return the existing row.
    async fn ensure(
        &self,
        user_id: Uuid,
        external_channel_id: &str,
        channel_title: &str,
        last_published_at: Option<DateTime<Utc>>,
    ) -> Result<ChannelSubscription>;

    /// List all subscriptions for a user.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChannelSubscription>>;

    /// Advance the last-known publish timestamp, keeping the newest value.
    async fn touch_last_published(&self, id: Uuid, published_at: DateTime<Utc>) -> Result<()>;

    /// Remove a subscription (explicit unsubscribe).
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

// =============================================================================
// VIDEO REPOSITORY
// =============================================================================

/// Repository for video records.
///
/// Uniqueness invariant: one row per (external_video_id, channel_id),
/// enforced by the store so the orchestrator's check-then-act upsert is
/// race-free.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch the record for a video within a channel.
    async fn find(&self, external_video_id: &str, channel_id: Uuid) -> Result<Option<VideoRecord>>;

    /// Insert a pending record, or return the existing row on conflict.
    /// A conflict means another invocation created it first; the caller
    /// re-reads and resumes rather than failing.
    async fn insert_or_fetch(&self, new: NewVideoRecord) -> Result<VideoRecord>;

    /// Write the pipeline outcome and mark the record terminal.
    async fn finalize(&self, id: Uuid, outcome: ProcessingOutcome) -> Result<VideoRecord>;

    /// List records for a channel, newest published first.
    async fn list_for_channel(
        &self,
        channel_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoRecord>>;
}

// =============================================================================
// JOB QUEUE
// =============================================================================

/// Status of a queued processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// A queued out-of-band invocation of the processing pipeline.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_reference: String,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Durable queue for running the orchestrator out-of-band from the request
/// path. The orchestrator itself never assumes the queue's presence.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Enqueue a processing request.
    async fn queue(&self, user_id: Uuid, video_reference: &str) -> Result<Uuid>;

    /// Atomically claim the next pending job, marking it running.
    async fn claim_next(&self) -> Result<Option<ProcessingJob>>;

    /// Mark a job completed.
    async fn complete(&self, id: Uuid) -> Result<()>;

    /// Record a failure. Retryable failures below the retry budget return the
    /// job to pending; otherwise it lands in failed.
    async fn fail(&self, id: Uuid, error: &str, retryable: bool) -> Result<()>;
}
