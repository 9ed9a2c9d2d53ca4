//! Mock artifact generator for deterministic testing.
//!
//! Returns a fixed summary and predictable artifact URLs, with switches to
//! force the degraded summary or individual artifact failures. Every call
//! is counted so tests can assert exactly what the orchestrator invoked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use tubebrief_core::{ArtifactGenerator, KeyConcept, MainPoint, StructuredSummary};

/// Mock artifact generator for testing.
#[derive(Clone)]
pub struct MockArtifactGenerator {
    degraded: bool,
    fail_mindmap: bool,
    fail_audio: bool,
    summarize_calls: Arc<AtomicUsize>,
    mindmap_calls: Arc<AtomicUsize>,
    audio_calls: Arc<AtomicUsize>,
}

impl Default for MockArtifactGenerator {
    fn default() -> Self {
        Self {
            degraded: false,
            fail_mindmap: false,
            fail_audio: false,
            summarize_calls: Arc::new(AtomicUsize::new(0)),
            mindmap_calls: Arc::new(AtomicUsize::new(0)),
            audio_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockArtifactGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `summarize` return the degraded placeholder.
    pub fn with_degraded_summary(mut self) -> Self {
        self.degraded = true;
        self
    }

    /// Make `render_mindmap` fail (return `None`).
    pub fn with_mindmap_failure(mut self) -> Self {
        self.fail_mindmap = true;
        self
    }

    /// Make `render_audio` fail (return `None`).
    pub fn with_audio_failure(mut self) -> Self {
        self.fail_audio = true;
        self
    }

    pub fn summarize_call_count(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub fn mindmap_call_count(&self) -> usize {
        self.mindmap_calls.load(Ordering::SeqCst)
    }

    pub fn audio_call_count(&self) -> usize {
        self.audio_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all operations.
    pub fn call_count(&self) -> usize {
        self.summarize_call_count() + self.mindmap_call_count() + self.audio_call_count()
    }

    /// The fixed summary served when not degraded.
    pub fn fixed_summary() -> StructuredSummary {
        StructuredSummary {
            main_points: vec![
                MainPoint {
                    point: "First main point".to_string(),
                    explanation: "Brief explanation of the first point".to_string(),
                },
                MainPoint {
                    point: "Second main point".to_string(),
                    explanation: "Brief explanation of the second point".to_string(),
                },
            ],
            summary: "A deterministic summary used in tests.".to_string(),
            key_concepts: vec![KeyConcept {
                concept: "First concept".to_string(),
                explanation: "Explanation of the first concept".to_string(),
            }],
        }
    }
}

#[async_trait]
impl ArtifactGenerator for MockArtifactGenerator {
    async fn summarize(&self, _transcript: &str, _title: &str) -> StructuredSummary {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        if self.degraded {
            StructuredSummary::degraded()
        } else {
            Self::fixed_summary()
        }
    }

    async fn render_mindmap(&self, _summary: &StructuredSummary) -> Option<String> {
        self.mindmap_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mindmap {
            None
        } else {
            Some("mem://mindmaps/fixed.png".to_string())
        }
    }

    async fn render_audio(&self, _summary: &StructuredSummary) -> Option<String> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_audio {
            None
        } else {
            Some("mem://audio/fixed.mp3".to_string())
        }
    }
}
