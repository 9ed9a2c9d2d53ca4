//! Mermaid mind-map derivation and rendering.

use std::time::Instant;

use reqwest::Client;
use tracing::debug;

use tubebrief_core::config::MindmapConfig;
use tubebrief_core::{Error, Result, StructuredSummary};

/// Derive mermaid mindmap markup from a structured summary.
///
/// The first main point becomes the root. Each main point gets a numbered
/// node, and key concepts are paired with main points by index; concepts
/// beyond the shorter of the two lists are dropped.
pub fn mermaid_source(summary: &StructuredSummary) -> String {
    let root = summary
        .main_points
        .first()
        .map(|p| p.point.as_str())
        .unwrap_or("Video Summary");

    let mut source = String::from("mindmap\n");
    source.push_str(&format!("  root({})\n", root));

    for (i, point) in summary.main_points.iter().enumerate() {
        source.push_str(&format!("    {}[{}]\n", i + 1, point.point));
        if let Some(concept) = summary.key_concepts.get(i) {
            source.push_str(&format!("      {}.1({})\n", i + 1, concept.concept));
        }
    }

    source
}

/// Renders mermaid markup to PNG via a Kroki-compatible service.
pub struct MindmapRenderer {
    client: Client,
    render_url: String,
}

impl MindmapRenderer {
    /// Create a new renderer from configuration.
    pub fn new(config: MindmapConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            render_url: config.render_url,
        }
    }

    /// Render mermaid markup to PNG bytes.
    pub async fn render_png(&self, source: &str) -> Result<Vec<u8>> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/mermaid/png", self.render_url))
            .header("Content-Type", "text/plain")
            .body(source.to_string())
            .send()
            .await
            .map_err(|e| Error::Generation(format!("render request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "render service returned {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Generation(format!("render response truncated: {}", e)))?;

        debug!(
            png_bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Mind map rendered"
        );
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubebrief_core::{KeyConcept, MainPoint};

    fn summary(points: &[&str], concepts: &[&str]) -> StructuredSummary {
        StructuredSummary {
            main_points: points
                .iter()
                .map(|p| MainPoint {
                    point: p.to_string(),
                    explanation: format!("{} explained", p),
                })
                .collect(),
            summary: "A summary.".to_string(),
            key_concepts: concepts
                .iter()
                .map(|c| KeyConcept {
                    concept: c.to_string(),
                    explanation: format!("{} explained", c),
                })
                .collect(),
        }
    }

    #[test]
    fn first_main_point_becomes_root() {
        let source = mermaid_source(&summary(&["Alpha", "Beta"], &["C1", "C2"]));

        assert!(source.starts_with("mindmap\n  root(Alpha)\n"));
        assert!(source.contains("    1[Alpha]\n"));
        assert!(source.contains("    2[Beta]\n"));
    }

    #[test]
    fn concepts_pair_with_points_by_index() {
        let source = mermaid_source(&summary(&["Alpha", "Beta"], &["C1", "C2"]));

        assert!(source.contains("      1.1(C1)\n"));
        assert!(source.contains("      2.1(C2)\n"));
    }

    #[test]
    fn extra_concepts_are_dropped() {
        let source = mermaid_source(&summary(&["Alpha"], &["C1", "C2", "C3"]));

        assert!(source.contains("1.1(C1)"));
        assert!(!source.contains("C2"));
        assert!(!source.contains("C3"));
    }

    #[test]
    fn fewer_concepts_than_points_is_fine() {
        let source = mermaid_source(&summary(&["Alpha", "Beta", "Gamma"], &["C1"]));

        assert!(source.contains("1.1(C1)"));
        assert!(source.contains("3[Gamma]"));
        assert!(!source.contains("2.1"));
    }

    #[test]
    fn empty_summary_still_yields_a_root() {
        let source = mermaid_source(&summary(&[], &[]));
        assert!(source.contains("root(Video Summary)"));
    }
}
