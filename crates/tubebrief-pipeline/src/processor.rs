//! Video processing orchestrator.
//!
//! Drives a video reference through resolution, metadata lookup,
//! subscription and record persistence, transcript fetch, summary
//! generation, and artifact rendering. The pipeline is synchronous and
//! performs no retries of its own; retry-eligible failures propagate to
//! the caller or queue layer.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use tubebrief_core::resolve::resolve_video_reference;
use tubebrief_core::{
    ArtifactGenerator, Error, MetadataGateway, NewVideoRecord, ProcessingOutcome, Result,
    SubscriptionRepository, VideoRecord, VideoRepository,
};

/// Orchestrates the full processing pipeline for one video reference.
pub struct VideoProcessor {
    gateway: Arc<dyn MetadataGateway>,
    generator: Arc<dyn ArtifactGenerator>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl VideoProcessor {
    /// Create a new processor from its capability dependencies.
    pub fn new(
        gateway: Arc<dyn MetadataGateway>,
        generator: Arc<dyn ArtifactGenerator>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        videos: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            gateway,
            generator,
            subscriptions,
            videos,
        }
    }

    /// Process a video reference end to end for the given user.
    ///
    /// Idempotent: a record that already carries a processed-at timestamp is
    /// returned as-is, with no gateway or generator calls. Non-finalized
    /// records resume from the transcript stage. Artifact failures degrade
    /// (absent URLs, marker summary) but the record still finalizes;
    /// a missing transcript aborts with `TranscriptUnavailable` while the
    /// persisted metadata stands.
    #[instrument(skip(self), fields(subsystem = "pipeline", component = "processor", op = "process_video", user_id = %user_id))]
    pub async fn process_video(
        &self,
        user_id: Uuid,
        video_reference: &str,
    ) -> Result<VideoRecord> {
        let start = Instant::now();

        // Fails synchronously, before any network call.
        let video_id = resolve_video_reference(video_reference)?;

        // Finalized records short-circuit from the store alone, before any
        // gateway or generator call.
        for subscription in self.subscriptions.list_for_user(user_id).await? {
            if let Some(existing) = self.videos.find(&video_id, subscription.id).await? {
                if existing.is_finalized() {
                    debug!(
                        video_id = %video_id,
                        record_id = %existing.id,
                        "Video already processed; returning stored record"
                    );
                    return Ok(existing);
                }
            }
        }

        let metadata = self
            .gateway
            .fetch_video(&video_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("video {} does not exist upstream", video_id)))?;

        let subscription = self
            .subscriptions
            .ensure(
                user_id,
                &metadata.external_channel_id,
                &metadata.channel_title,
                Some(metadata.published_at),
            )
            .await?;

        let record = self
            .videos
            .insert_or_fetch(NewVideoRecord {
                external_video_id: video_id.clone(),
                channel_id: subscription.id,
                title: metadata.title.clone(),
                description: metadata.description.clone(),
                published_at: metadata.published_at,
            })
            .await?;

        if record.is_finalized() {
            debug!(
                video_id = %video_id,
                record_id = %record.id,
                "Video already processed; returning stored record"
            );
            return Ok(record);
        }

        let transcript = self
            .gateway
            .fetch_transcript(&video_id)
            .await?
            .ok_or_else(|| Error::TranscriptUnavailable(video_id.clone()))?;

        let summary = self.generator.summarize(&transcript, &record.title).await;

        // Mind-map and audio are independent; run them concurrently. Either
        // may fail without blocking finalization.
        let (mindmap_url, mp3_url) = tokio::join!(
            self.generator.render_mindmap(&summary),
            self.generator.render_audio(&summary)
        );

        let finalized = self
            .videos
            .finalize(
                record.id,
                ProcessingOutcome {
                    transcript,
                    summary_json: serde_json::to_value(&summary)?,
                    mindmap_url,
                    mp3_url,
                    processed_at: Utc::now(),
                },
            )
            .await?;

        // Keep the subscription's high-water mark current so newer uploads
        // are distinguishable from already-seen ones.
        self.subscriptions
            .touch_last_published(subscription.id, metadata.published_at)
            .await?;

        info!(
            video_id = %video_id,
            record_id = %finalized.id,
            degraded = summary.is_degraded(),
            mindmap = finalized.mindmap_url.is_some(),
            audio = finalized.mp3_url.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Video processed"
        );

        Ok(finalized)
    }
}
