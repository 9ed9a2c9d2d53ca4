//! Structured summary generation via a chat-completion backend.
//!
//! Summarization never surfaces errors: any request, parse, or validation
//! failure collapses into [`StructuredSummary::degraded`], and processing
//! continues with the marker payload.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tubebrief_core::config::GenerationConfig;
use tubebrief_core::defaults::{GEN_TEMPERATURE, PROMPT_TRANSCRIPT_LIMIT};
use tubebrief_core::{Error, Result, StructuredSummary};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes YouTube videos.";

/// Chat-completion summarization backend.
pub struct ChatSummaryBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatSummaryBackend {
    /// Create a new backend from configuration.
    pub fn new(config: GenerationConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            model: config.model,
        }
    }

    /// Derive a structured summary from a transcript. Falls back to the
    /// degraded placeholder on any failure.
    pub async fn summarize(&self, transcript: &str, title: &str) -> StructuredSummary {
        let start = Instant::now();
        match self.summarize_inner(transcript, title).await {
            Ok(summary) => {
                debug!(
                    main_points = summary.main_points.len(),
                    key_concepts = summary.key_concepts.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Summary generated"
                );
                summary
            }
            Err(e) => {
                warn!(error = %e, degraded = true, "Summary generation failed");
                StructuredSummary::degraded()
            }
        }
    }

    async fn summarize_inner(&self, transcript: &str, title: &str) -> Result<StructuredSummary> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(transcript, title),
                },
            ],
            temperature: GEN_TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "completion endpoint returned {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("malformed completion payload: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Generation("completion returned no choices".to_string()))?;

        parse_summary(&content)
    }
}

/// Build the summarization prompt, truncating the transcript to keep the
/// request inside the model's context budget.
pub fn build_prompt(transcript: &str, title: &str) -> String {
    let truncated: String = transcript.chars().take(PROMPT_TRANSCRIPT_LIMIT).collect();

    format!(
        "Video Title: {title}\n\
         \n\
         Transcript:\n\
         {truncated}...\n\
         \n\
         Please provide a comprehensive summary of this video with the following sections:\n\
         1. Main Points (list the 3-5 key takeaways)\n\
         2. Summary (2-3 paragraphs summarizing the content)\n\
         3. Key Concepts (list and briefly explain 3-5 important concepts from the video)\n\
         \n\
         Format the response as a JSON object with the following structure:\n\
         {{\n\
             \"main_points\": [\n\
                 {{ \"point\": \"First main point\", \"explanation\": \"Brief explanation\" }}\n\
             ],\n\
             \"summary\": \"Full summary text with multiple paragraphs\",\n\
             \"key_concepts\": [\n\
                 {{ \"concept\": \"Concept name\", \"explanation\": \"Concept explanation\" }}\n\
             ]\n\
         }}"
    )
}

/// Parse a model response into a structured summary, tolerating markdown
/// code fences around the JSON body.
pub fn parse_summary(content: &str) -> Result<StructuredSummary> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let summary: StructuredSummary = serde_json::from_str(body)
        .map_err(|e| Error::Generation(format!("summary is not valid JSON: {}", e)))?;

    if summary.main_points.is_empty() && summary.summary.is_empty() {
        return Err(Error::Generation("summary payload is empty".to_string()));
    }

    Ok(summary)
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
