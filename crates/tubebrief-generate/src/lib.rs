//! # tubebrief-generate
//!
//! Artifact generation for tubebrief: structured summaries, mermaid
//! mind-maps, and audio narration.
//!
//! This crate provides:
//! - [`ChatSummaryBackend`] for chat-completion summarization with a
//!   degraded fallback payload
//! - [`mermaid_source`] / [`MindmapRenderer`] for mind-map derivation and
//!   PNG rendering
//! - [`narration_script`] / [`SpeechBackend`] for audio narration
//! - [`ArtifactStore`] implementations for uploaded artifacts
//! - [`Generator`], the production [`ArtifactGenerator`], and
//!   [`MockArtifactGenerator`] for tests
//!
//! Failure semantics: summarization degrades into a marker payload, and
//! mind-map/audio failures yield absent URLs. Nothing here aborts video
//! processing.

pub mod generate;
pub mod mindmap;
pub mod mock;
pub mod speech;
pub mod store;
pub mod summarize;

pub use generate::Generator;
pub use mindmap::{mermaid_source, MindmapRenderer};
pub use mock::MockArtifactGenerator;
pub use speech::{narration_script, SpeechBackend};
pub use store::{artifact_key, ArtifactStore, HttpArtifactStore, InMemoryArtifactStore};
pub use summarize::ChatSummaryBackend;

// Re-export the trait and summary types callers need alongside the generator.
pub use tubebrief_core::{ArtifactGenerator, KeyConcept, MainPoint, StructuredSummary};
