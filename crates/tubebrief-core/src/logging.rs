//! Structured logging schema and field name constants for tubebrief.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, pipeline stage completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → job → sub-calls.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "db", "youtube", "generate", "pipeline", "worker"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "gateway", "summarizer", "mindmap", "audio", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "fetch_video", "summarize", "process_video", "claim_next"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// External video ID being processed.
pub const VIDEO_ID: &str = "video_id";

/// External channel ID being looked up.
pub const CHANNEL_ID: &str = "channel_id";

/// Acting user UUID.
pub const USER_ID: &str = "user_id";

/// Job UUID being processed.
pub const JOB_ID: &str = "job_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a transcript or prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response or rendered artifact.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Summary generation fell back to the degraded placeholder.
pub const DEGRADED: &str = "degraded";
