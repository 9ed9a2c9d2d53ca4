//! Audio narration script derivation and speech synthesis.

use std::time::Instant;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use tubebrief_core::config::SpeechConfig;
use tubebrief_core::{Error, Result, StructuredSummary};

/// Derive the narration script read by the speech backend.
///
/// Numbered main points with their explanations, then the prose summary.
pub fn narration_script(summary: &StructuredSummary) -> String {
    let mut script = String::from("Here's a summary of this video. ");

    script.push_str("Main points: ");
    for (i, point) in summary.main_points.iter().enumerate() {
        script.push_str(&format!("{}. {}. ", i + 1, point.point));
        script.push_str(&format!("{}. ", point.explanation));
    }

    script.push_str(&format!("Summary: {}. ", summary.summary));
    script
}

/// Text-to-speech backend.
pub struct SpeechBackend {
    client: Client,
    base_url: String,
    api_key: String,
    voice_id: String,
    model: String,
}

#[derive(Serialize)]
struct SpeechRequest {
    text: String,
    model_id: String,
}

impl SpeechBackend {
    /// Create a new backend from configuration.
    pub fn new(config: SpeechConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            voice_id: config.voice_id,
            model: config.model,
        }
    }

    /// Synthesize narration text to MP3 bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let start = Instant::now();

        let request = SpeechRequest {
            text: text.to_string(),
            model_id: self.model.clone(),
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/text-to-speech/{}",
                self.base_url, self.voice_id
            ))
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("speech request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "speech endpoint returned {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Generation(format!("speech response truncated: {}", e)))?;

        debug!(
            text_len = text.len(),
            mp3_bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Narration synthesized"
        );
        Ok(bytes.to_vec())
    }
}
