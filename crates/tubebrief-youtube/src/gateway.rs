//! YouTube Data API gateway implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use tubebrief_core::config::YouTubeConfig;
use tubebrief_core::resolve::ChannelLookup;
use tubebrief_core::{ChannelMetadata, Error, MetadataGateway, Result, VideoMetadata};

use crate::wire::{ChannelListResponse, TranscriptResponse, VideoListResponse};

/// Metadata gateway backed by the YouTube Data API v3.
///
/// Lookups distinguish two outcomes the caller must keep apart: `Ok(None)`
/// when the upstream confirms the entity does not exist, and `Error::Gateway`
/// when the upstream is unreachable or returns a malformed payload.
pub struct YouTubeGateway {
    client: Client,
    base_url: String,
    api_key: String,
    transcript_url: Option<String>,
    timeout: Duration,
}

impl YouTubeGateway {
    /// Create a new gateway from configuration.
    pub fn new(config: YouTubeConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            transcript_url: config.transcript_url,
            timeout: config.timeout,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(YouTubeConfig::from_env()?))
    }

    /// Query parameter the Data API expects for each lookup strategy.
    fn lookup_param(lookup: &ChannelLookup) -> &'static str {
        match lookup {
            ChannelLookup::ById(_) => "id",
            ChannelLookup::ByUsername(_) => "forUsername",
            ChannelLookup::ByHandle(_) => "forHandle",
        }
    }
}

#[async_trait]
impl MetadataGateway for YouTubeGateway {
    #[instrument(skip(self), fields(subsystem = "youtube", component = "gateway", op = "fetch_channel"))]
    async fn fetch_channel(&self, lookup: &ChannelLookup) -> Result<Option<ChannelMetadata>> {
        let start = Instant::now();
        let param = Self::lookup_param(lookup);

        let response = self
            .client
            .get(format!("{}/channels", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("key", self.api_key.as_str()),
                (param, lookup.value()),
            ])
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("channel lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "channels endpoint returned {}: {}",
                status, body
            )));
        }

        let result: ChannelListResponse = response
            .json()
            .await
            .map_err(|e| Error::Gateway(format!("malformed channel payload: {}", e)))?;

        debug!(
            lookup_param = param,
            found = !result.items.is_empty(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Channel lookup complete"
        );

        Ok(result.items.into_iter().next().map(|item| ChannelMetadata {
            external_channel_id: item.id,
            title: item.snippet.title,
        }))
    }

    #[instrument(skip(self), fields(subsystem = "youtube", component = "gateway", op = "fetch_video", video_id = external_video_id))]
    async fn fetch_video(&self, external_video_id: &str) -> Result<Option<VideoMetadata>> {
        let start = Instant::now();

        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("key", self.api_key.as_str()),
                ("id", external_video_id),
            ])
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("video lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "videos endpoint returned {}: {}",
                status, body
            )));
        }

        let result: VideoListResponse = response
            .json()
            .await
            .map_err(|e| Error::Gateway(format!("malformed video payload: {}", e)))?;

        debug!(
            found = !result.items.is_empty(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Video lookup complete"
        );

        Ok(result.items.into_iter().next().map(|item| VideoMetadata {
            external_video_id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            external_channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
        }))
    }

    #[instrument(skip(self), fields(subsystem = "youtube", component = "gateway", op = "fetch_transcript", video_id = external_video_id))]
    async fn fetch_transcript(&self, external_video_id: &str) -> Result<Option<String>> {
        let Some(base) = &self.transcript_url else {
            warn!("Transcript source not configured; treating captions as unavailable");
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/transcripts/{}", base, external_video_id))
            .timeout(self.timeout.max(Duration::from_secs(
                tubebrief_core::defaults::TRANSCRIPT_TIMEOUT_SECS,
            )))
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("transcript request failed: {}", e)))?;

        // 404 from the transcript source means captions do not exist.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "transcript source returned {}: {}",
                status, body
            )));
        }

        let result: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| Error::Gateway(format!("malformed transcript payload: {}", e)))?;

        if result.transcript.trim().is_empty() {
            return Ok(None);
        }

        debug!(
            transcript_len = result.transcript.len(),
            "Transcript fetched"
        );
        Ok(Some(result.transcript))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_param_matches_strategy() {
        assert_eq!(
            YouTubeGateway::lookup_param(&ChannelLookup::ById("UCabcdEFGHijklMNOpqrstuv".into())),
            "id"
        );
        assert_eq!(
            YouTubeGateway::lookup_param(&ChannelLookup::ByUsername("somebody".into())),
            "forUsername"
        );
        assert_eq!(
            YouTubeGateway::lookup_param(&ChannelLookup::ByHandle("somehandle".into())),
            "forHandle"
        );
    }
}
