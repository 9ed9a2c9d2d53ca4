//! Core data models for tubebrief.
//!
//! These types are shared across all tubebrief crates and represent the
//! domain entities of the video-summary pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered user, created on first successful external login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Long-lived external-auth refresh credential, if the identity
    /// provider issued one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_refresh_token: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Verified identity supplied by the auth collaborator. The core trusts
/// this as already-authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// =============================================================================
// SUBSCRIPTION TYPES
// =============================================================================

/// One user's subscription to one externally-identified channel.
///
/// Invariant: (user_id, external_channel_id) is unique. Created either by an
/// explicit subscribe action or lazily by the orchestrator the first time a
/// video from an unknown channel is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub external_channel_id: String,
    pub channel_title: String,
    /// Publish timestamp of the newest video known on this channel.
    pub last_published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// VIDEO TYPES
// =============================================================================

/// Durable record of one processed (or in-flight) video.
///
/// Invariant: (external_video_id, channel_id) is unique. Created in pending
/// shape (no transcript/summary/artifacts), mutated in place as pipeline
/// stages complete, terminal once `processed_at` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub external_video_id: String,
    pub channel_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub transcript: Option<String>,
    pub summary_json: Option<JsonValue>,
    pub mindmap_url: Option<String>,
    pub mp3_url: Option<String>,
    /// Set when the pipeline reaches its terminal state. A record with this
    /// set short-circuits reprocessing.
    pub processed_at: Option<DateTime<Utc>>,
    /// Reserved for the not-yet-implemented notification step.
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Whether the record is in its terminal state.
    pub fn is_finalized(&self) -> bool {
        self.processed_at.is_some()
    }
}

/// Request to create a pending video record.
#[derive(Debug, Clone)]
pub struct NewVideoRecord {
    pub external_video_id: String,
    pub channel_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Results of the generation stages, written back when finalizing.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub transcript: String,
    pub summary_json: JsonValue,
    pub mindmap_url: Option<String>,
    pub mp3_url: Option<String>,
    pub processed_at: DateTime<Utc>,
}

// =============================================================================
// UPSTREAM METADATA TYPES
// =============================================================================

/// Channel metadata as reported by the video platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub external_channel_id: String,
    pub title: String,
}

/// Video metadata as reported by the video platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub external_video_id: String,
    pub title: String,
    pub description: Option<String>,
    pub external_channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
}

// =============================================================================
// STRUCTURED SUMMARY
// =============================================================================

/// Marker text embedded in a degraded summary in place of real content.
///
/// Degradation is detected via this marker, never via a propagated error:
/// the summarize stage must always return a structurally valid summary.
pub const DEGRADED_SUMMARY_POINT: &str = "Error generating summary";

/// A single main takeaway of the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPoint {
    pub point: String,
    pub explanation: String,
}

/// A named concept the video introduces, with a short explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConcept {
    pub concept: String,
    pub explanation: String,
}

/// Structured summary of a transcript, the contract between the summarizer
/// and both downstream generators (mind-map, audio).
///
/// Downstream consumers must degrade gracefully on empty lists or an empty
/// narrative rather than fail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredSummary {
    #[serde(default)]
    pub main_points: Vec<MainPoint>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_concepts: Vec<KeyConcept>,
}

impl StructuredSummary {
    /// Build the degraded placeholder summary used when generation fails
    /// internally. Structurally valid so the pipeline can still persist it.
    pub fn degraded() -> Self {
        Self {
            main_points: vec![MainPoint {
                point: DEGRADED_SUMMARY_POINT.to_string(),
                explanation: "Please try again later".to_string(),
            }],
            summary: "There was an error generating the summary for this video.".to_string(),
            key_concepts: vec![KeyConcept {
                concept: "Error".to_string(),
                explanation: "Please try again later".to_string(),
            }],
        }
    }

    /// Whether this summary is the degraded placeholder.
    pub fn is_degraded(&self) -> bool {
        self.main_points
            .first()
            .is_some_and(|p| p.point == DEGRADED_SUMMARY_POINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_summary_carries_marker() {
        let summary = StructuredSummary::degraded();
        assert!(summary.is_degraded());
        assert_eq!(summary.main_points[0].point, DEGRADED_SUMMARY_POINT);
        assert!(!summary.summary.is_empty());
        assert!(!summary.key_concepts.is_empty());
    }

    #[test]
    fn genuine_summary_is_not_degraded() {
        let summary = StructuredSummary {
            main_points: vec![MainPoint {
                point: "Rust ownership".to_string(),
                explanation: "Move semantics by default".to_string(),
            }],
            summary: "A video about Rust.".to_string(),
            key_concepts: vec![],
        };
        assert!(!summary.is_degraded());
    }

    #[test]
    fn empty_summary_is_not_degraded() {
        assert!(!StructuredSummary::default().is_degraded());
    }

    #[test]
    fn summary_round_trips_through_json() {
        let summary = StructuredSummary {
            main_points: vec![MainPoint {
                point: "p1".to_string(),
                explanation: "e1".to_string(),
            }],
            summary: "para one\n\npara two".to_string(),
            key_concepts: vec![KeyConcept {
                concept: "c1".to_string(),
                explanation: "ce1".to_string(),
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        let back: StructuredSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        // The model may omit sections entirely; deserialization must not fail.
        let parsed: StructuredSummary =
            serde_json::from_str(r#"{"summary": "only a narrative"}"#).unwrap();
        assert!(parsed.main_points.is_empty());
        assert_eq!(parsed.summary, "only a narrative");
    }

    #[test]
    fn video_record_finalized_predicate() {
        let mut record = VideoRecord {
            id: Uuid::now_v7(),
            external_video_id: "abc123XYZ_".to_string(),
            channel_id: Uuid::now_v7(),
            title: "t".to_string(),
            description: None,
            published_at: Utc::now(),
            transcript: None,
            summary_json: None,
            mindmap_url: None,
            mp3_url: None,
            processed_at: None,
            sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!record.is_finalized());
        record.processed_at = Some(Utc::now());
        assert!(record.is_finalized());
    }
}
