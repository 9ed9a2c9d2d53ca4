//! Error types for tubebrief.

use thiserror::Error;

/// Result type alias using tubebrief's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tubebrief operations.
///
/// The processing pipeline distinguishes final outcomes (`NotFound`,
/// `TranscriptUnavailable`) from retry-eligible ones (`Gateway`). Artifact
/// generation never surfaces here; it degrades into markers or absent
/// artifact references instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed channel or video reference. Raised at the boundary,
    /// before any network call.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Upstream confirms the channel/video does not exist. Final, not
    /// retryable.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Captions/transcript missing for the video. Final for this attempt;
    /// any persisted metadata stands.
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    /// Upstream unreachable or returned a malformed payload. Retry-eligible
    /// by the caller or queue layer, never retried by the orchestrator.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Summary/artifact generation failed internally
    #[error("Generation error: {0}")]
    Generation(String),

    /// Artifact storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job queue error
    #[error("Job error: {0}")]
    Job(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether a caller or queue layer may retry the failed request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Gateway(_) | Error::Database(_) | Error::Job(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Gateway(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_reference() {
        let err = Error::InvalidReference("not-a-channel-or-url".to_string());
        assert_eq!(err.to_string(), "Invalid reference: not-a-channel-or-url");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("video dQw4w9WgXcQ".to_string());
        assert_eq!(err.to_string(), "Not found: video dQw4w9WgXcQ");
    }

    #[test]
    fn test_error_display_transcript_unavailable() {
        let err = Error::TranscriptUnavailable("no captions".to_string());
        assert_eq!(err.to_string(), "Transcript unavailable: no captions");
    }

    #[test]
    fn test_error_display_gateway() {
        let err = Error::Gateway("upstream returned 503".to_string());
        assert_eq!(err.to_string(), "Gateway error: upstream returned 503");
    }

    #[test]
    fn test_error_display_generation() {
        let err = Error::Generation("model timeout".to_string());
        assert_eq!(err.to_string(), "Generation error: model timeout");
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("bucket unreachable".to_string());
        assert_eq!(err.to_string(), "Storage error: bucket unreachable");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Gateway("503".into()).is_retryable());
        assert!(!Error::NotFound("gone".into()).is_retryable());
        assert!(!Error::InvalidReference("junk".into()).is_retryable());
        assert!(!Error::TranscriptUnavailable("none".into()).is_retryable());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
