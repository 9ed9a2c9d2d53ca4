//! Wire types for the YouTube Data API v3 list endpoints.
//!
//! Only the fields the gateway reads are modeled; everything else in the
//! upstream payload is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response envelope for `GET /channels`.
#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    pub id: String,
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
}

/// Response envelope for `GET /videos`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
}

/// Response from the caption/transcript source.
#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}
