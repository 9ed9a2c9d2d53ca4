//! Process configuration.
//!
//! API clients and credentials are explicit configuration passed into the
//! gateway and generator constructors; lifecycle is owned by the process
//! entry point, never by the components themselves.

use std::time::Duration;

use crate::defaults;
use crate::error::{Error, Result};

/// Configuration for the external metadata gateway.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    /// Base URL of the Data API (overridable for tests).
    pub base_url: String,
    /// API key sent with every lookup.
    pub api_key: String,
    /// Base URL of the transcript/caption source, if configured.
    pub transcript_url: Option<String>,
    /// Request timeout for metadata lookups.
    pub timeout: Duration,
}

impl YouTubeConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `YOUTUBE_API_URL` | Data API v3 | Base URL, overridable for tests |
    /// | `YOUTUBE_API_KEY` | required | API key sent with every lookup |
    /// | `TRANSCRIPT_API_URL` | unset | Caption source; unset means no transcripts |
    /// | `YOUTUBE_TIMEOUT` | `30` | Request timeout in seconds |
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: std::env::var("YOUTUBE_API_URL")
                .unwrap_or_else(|_| defaults::YOUTUBE_API_URL.to_string()),
            api_key: required("YOUTUBE_API_KEY")?,
            transcript_url: std::env::var("TRANSCRIPT_API_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            timeout: timeout_from_env("YOUTUBE_TIMEOUT", defaults::GATEWAY_TIMEOUT_SECS),
        })
    }
}

/// Configuration for the chat-completion summarization backend.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Configuration for the text-to-speech backend.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub base_url: String,
    pub api_key: String,
    pub voice_id: String,
    pub model: String,
    pub timeout: Duration,
}

/// Configuration for the mermaid render service.
#[derive(Debug, Clone)]
pub struct MindmapConfig {
    /// Base URL of a Kroki-compatible render endpoint.
    pub render_url: String,
    pub timeout: Duration,
}

/// Configuration for artifact storage.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Endpoint objects are PUT to.
    pub endpoint: String,
    /// Public base URL artifacts are served from.
    pub public_base_url: String,
}

/// Configuration for the background job worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub poll_interval_ms: u64,
    pub max_concurrent_jobs: usize,
    pub enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::JOB_POLL_INTERVAL_MS,
            max_concurrent_jobs: defaults::JOB_MAX_CONCURRENT,
            enabled: true,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `JOB_WORKER_ENABLED` | `true` | Enable/disable job processing |
    /// | `JOB_MAX_CONCURRENT` | `4` | Max concurrent jobs |
    /// | `JOB_POLL_INTERVAL_MS` | `500` | Polling interval when queue is empty |
    pub fn from_env() -> Self {
        let enabled = std::env::var("JOB_WORKER_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let max_concurrent_jobs = std::env::var("JOB_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults::JOB_MAX_CONCURRENT)
            .max(1);

        let poll_interval_ms = std::env::var("JOB_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::JOB_POLL_INTERVAL_MS);

        Self {
            poll_interval_ms,
            max_concurrent_jobs,
            enabled,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub youtube: YouTubeConfig,
    pub generation: GenerationConfig,
    pub speech: SpeechConfig,
    pub mindmap: MindmapConfig,
    pub storage: StorageConfig,
    pub worker: WorkerConfig,
}

fn required(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{} must be set", name)))
}

fn timeout_from_env(name: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

impl AppConfig {
    /// Build configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`, `YOUTUBE_API_KEY`, `OPENAI_API_KEY`,
    /// `ELEVENLABS_API_KEY`, `ELEVENLABS_VOICE_ID`, `ARTIFACT_STORE_URL`.
    /// Everything else has a default from [`crate::defaults`].
    pub fn from_env() -> Result<Self> {
        let storage_endpoint = required("ARTIFACT_STORE_URL")?;
        let public_base_url = std::env::var("ARTIFACT_PUBLIC_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| storage_endpoint.clone());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            youtube: YouTubeConfig::from_env()?,
            generation: GenerationConfig {
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                api_key: required("OPENAI_API_KEY")?,
                model: std::env::var("GEN_MODEL")
                    .unwrap_or_else(|_| defaults::GEN_MODEL.to_string()),
                timeout: timeout_from_env("GEN_TIMEOUT", defaults::GEN_TIMEOUT_SECS),
            },
            speech: SpeechConfig {
                base_url: std::env::var("ELEVENLABS_BASE_URL")
                    .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
                api_key: required("ELEVENLABS_API_KEY")?,
                voice_id: required("ELEVENLABS_VOICE_ID")?,
                model: std::env::var("SPEECH_MODEL")
                    .unwrap_or_else(|_| defaults::SPEECH_MODEL.to_string()),
                timeout: timeout_from_env("SPEECH_TIMEOUT", defaults::SPEECH_TIMEOUT_SECS),
            },
            mindmap: MindmapConfig {
                render_url: std::env::var("MINDMAP_RENDER_URL")
                    .unwrap_or_else(|_| "https://kroki.io".to_string()),
                timeout: timeout_from_env("MINDMAP_TIMEOUT", defaults::GEN_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                endpoint: storage_endpoint,
                public_base_url,
            },
            worker: WorkerConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_config_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.poll_interval_ms, defaults::JOB_POLL_INTERVAL_MS);
        assert_eq!(config.max_concurrent_jobs, defaults::JOB_MAX_CONCURRENT);
        assert!(config.enabled);
    }

    #[test]
    fn timeout_falls_back_to_default() {
        let timeout = timeout_from_env("TUBEBRIEF_TEST_UNSET_TIMEOUT", 42);
        assert_eq!(timeout, Duration::from_secs(42));
    }
}
