//! Production artifact generator.
//!
//! Composes the chat summarizer, mermaid renderer, speech backend, and
//! artifact store. Rendering and storage failures degrade to absent
//! artifact URLs; they never abort processing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use tubebrief_core::{ArtifactGenerator, StructuredSummary};

use crate::mindmap::{mermaid_source, MindmapRenderer};
use crate::speech::{narration_script, SpeechBackend};
use crate::store::{artifact_key, ArtifactStore};
use crate::summarize::ChatSummaryBackend;

/// Artifact generator backed by external generation services.
pub struct Generator {
    summarizer: ChatSummaryBackend,
    renderer: MindmapRenderer,
    speech: SpeechBackend,
    store: Arc<dyn ArtifactStore>,
}

impl Generator {
    /// Create a new generator from its components.
    pub fn new(
        summarizer: ChatSummaryBackend,
        renderer: MindmapRenderer,
        speech: SpeechBackend,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            summarizer,
            renderer,
            speech,
            store,
        }
    }
}

#[async_trait]
impl ArtifactGenerator for Generator {
    async fn summarize(&self, transcript: &str, title: &str) -> StructuredSummary {
        self.summarizer.summarize(transcript, title).await
    }

    async fn render_mindmap(&self, summary: &StructuredSummary) -> Option<String> {
        let source = mermaid_source(summary);

        let png = match self.renderer.render_png(&source).await {
            Ok(png) => png,
            Err(e) => {
                warn!(error = %e, "Mind map rendering failed");
                return None;
            }
        };

        let key = artifact_key("mindmaps", &png, "png");
        match self.store.put(&key, "image/png", png).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, key, "Mind map upload failed");
                None
            }
        }
    }

    async fn render_audio(&self, summary: &StructuredSummary) -> Option<String> {
        let script = narration_script(summary);

        let mp3 = match self.speech.synthesize(&script).await {
            Ok(mp3) => mp3,
            Err(e) => {
                warn!(error = %e, "Narration synthesis failed");
                return None;
            }
        };

        let key = artifact_key("audio", &mp3, "mp3");
        match self.store.put(&key, "audio/mpeg", mp3).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, key, "Narration upload failed");
                None
            }
        }
    }
}
