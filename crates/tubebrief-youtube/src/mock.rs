//! Mock metadata gateway for deterministic testing.
//!
//! Serves channel/video/transcript fixtures from in-process maps and logs
//! every call so tests can assert exactly what the orchestrator touched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tubebrief_core::resolve::ChannelLookup;
use tubebrief_core::{ChannelMetadata, Error, MetadataGateway, Result, VideoMetadata};

/// Mock metadata gateway for testing.
#[derive(Clone, Default)]
pub struct MockMetadataGateway {
    fixtures: Arc<Mutex<MockFixtures>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Default)]
struct MockFixtures {
    /// Keyed by lookup value (channel ID, username, or handle without `@`).
    channels: HashMap<String, ChannelMetadata>,
    videos: HashMap<String, VideoMetadata>,
    transcripts: HashMap<String, String>,
    /// Operations forced to return `Error::Gateway`.
    failing_ops: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

impl MockMetadataGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve channel metadata for the given lookup value.
    pub fn with_channel(self, lookup_value: impl Into<String>, channel: ChannelMetadata) -> Self {
        self.fixtures
            .lock()
            .unwrap()
            .channels
            .insert(lookup_value.into(), channel);
        self
    }

    /// Serve video metadata for the given external video ID.
    pub fn with_video(self, video: VideoMetadata) -> Self {
        self.fixtures
            .lock()
            .unwrap()
            .videos
            .insert(video.external_video_id.clone(), video);
        self
    }

    /// Serve a transcript for the given external video ID.
    pub fn with_transcript(
        self,
        external_video_id: impl Into<String>,
        transcript: impl Into<String>,
    ) -> Self {
        self.fixtures
            .lock()
            .unwrap()
            .transcripts
            .insert(external_video_id.into(), transcript.into());
        self
    }

    /// Force an operation (`fetch_channel`, `fetch_video`, `fetch_transcript`)
    /// to return a gateway error.
    pub fn with_failing_op(self, operation: &'static str) -> Self {
        self.fixtures.lock().unwrap().failing_ops.push(operation);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Total number of calls made against the gateway.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Number of calls to a specific operation.
    pub fn op_call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });
    }

    fn check_failure(&self, operation: &'static str) -> Result<()> {
        if self
            .fixtures
            .lock()
            .unwrap()
            .failing_ops
            .contains(&operation)
        {
            return Err(Error::Gateway(format!("mock failure: {}", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataGateway for MockMetadataGateway {
    async fn fetch_channel(&self, lookup: &ChannelLookup) -> Result<Option<ChannelMetadata>> {
        self.log_call("fetch_channel", lookup.value());
        self.check_failure("fetch_channel")?;
        Ok(self
            .fixtures
            .lock()
            .unwrap()
            .channels
            .get(lookup.value())
            .cloned())
    }

    async fn fetch_video(&self, external_video_id: &str) -> Result<Option<VideoMetadata>> {
        self.log_call("fetch_video", external_video_id);
        self.check_failure("fetch_video")?;
        Ok(self
            .fixtures
            .lock()
            .unwrap()
            .videos
            .get(external_video_id)
            .cloned())
    }

    async fn fetch_transcript(&self, external_video_id: &str) -> Result<Option<String>> {
        self.log_call("fetch_transcript", external_video_id);
        self.check_failure("fetch_transcript")?;
        Ok(self
            .fixtures
            .lock()
            .unwrap()
            .transcripts
            .get(external_video_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_video(id: &str) -> VideoMetadata {
        VideoMetadata {
            external_video_id: id.to_string(),
            title: "Sample".to_string(),
            description: None,
            external_channel_id: "UCabcdEFGHijklMNOpqrstuv".to_string(),
            channel_title: "Sample Channel".to_string(),
            published_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn absent_fixture_means_not_found() {
        let gateway = MockMetadataGateway::new();
        assert!(gateway.fetch_video("missing").await.unwrap().is_none());
        assert_eq!(gateway.op_call_count("fetch_video"), 1);
    }

    #[tokio::test]
    async fn forced_failure_surfaces_as_gateway_error() {
        let gateway = MockMetadataGateway::new()
            .with_video(sample_video("abc123XYZ_"))
            .with_failing_op("fetch_video");

        let err = gateway.fetch_video("abc123XYZ_").await.unwrap_err();
        assert!(matches!(err, Error::Gateway(_)));
    }

    #[tokio::test]
    async fn handle_lookup_is_keyed_without_at_prefix() {
        let gateway = MockMetadataGateway::new().with_channel(
            "somehandle",
            ChannelMetadata {
                external_channel_id: "UCabcdEFGHijklMNOpqrstuv".to_string(),
                title: "Handle Channel".to_string(),
            },
        );

        let lookup = ChannelLookup::from_identifier("@somehandle");
        let channel = gateway.fetch_channel(&lookup).await.unwrap();
        assert_eq!(channel.unwrap().title, "Handle Channel");
    }
}
