//! Centralized default constants for the tubebrief system.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// EXTERNAL METADATA GATEWAY
// =============================================================================

/// Base URL of the YouTube Data API v3.
pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Request timeout for metadata lookups, in seconds.
pub const GATEWAY_TIMEOUT_SECS: u64 = 30;

/// Request timeout for transcript fetches, in seconds.
pub const TRANSCRIPT_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// SUMMARY GENERATION
// =============================================================================

/// Default chat-completion model for summarization.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for summarization.
pub const GEN_TEMPERATURE: f32 = 0.5;

/// Request timeout for generation calls, in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Maximum transcript characters included in the summarization prompt.
pub const PROMPT_TRANSCRIPT_LIMIT: usize = 4000;

// =============================================================================
// AUDIO NARRATION
// =============================================================================

/// Default text-to-speech model.
pub const SPEECH_MODEL: &str = "eleven_monolingual_v1";

/// Request timeout for speech synthesis, in seconds.
pub const SPEECH_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// JOB WORKER
// =============================================================================

/// Polling interval when the queue is empty, in milliseconds.
pub const JOB_POLL_INTERVAL_MS: u64 = 500;

/// Maximum concurrent pipeline jobs per worker.
pub const JOB_MAX_CONCURRENT: usize = 4;

/// Retry budget for retry-eligible job failures.
pub const JOB_MAX_RETRIES: i32 = 3;
