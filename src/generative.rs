//! Generative text backend
//!
//! Agents hand a finished prompt to a `TextGenerator` and get plain text
//! back. The production implementation is a Gemini client that keeps one
//! long-lived reqwest::Client for connection pooling.

use crate::config::GeminiConfig;
use crate::error::AssistantError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Anything that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Errors are `BackendUnavailable` when the service could not be reached
    /// or refused the request, `MalformedResponse` when it answered with
    /// something unusable.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

const PLAIN_TEXT_INSTRUCTION: &str =
    "Provide the response in plain text without any markdown formatting, asterisks, or hashes.";

const SYSTEM_PROMPT: &str = r#"You are a personal financial assistant for a single user's budget.

Guidelines:
- Be concise and practical
- Ground answers in the context you are given
- Flag uncertainty and risk honestly
- Never invent account balances or transactions"#;

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
        })
    }

    fn build_request(prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{}\n\n{}", prompt, PLAIN_TEXT_INSTRUCTION),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.9,
                max_output_tokens: 1000,
            },
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(AssistantError::BackendUnavailable(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        info!(prompt_len = prompt.len(), "Calling Gemini API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                AssistantError::BackendUnavailable(format!("Gemini API error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Gemini API error response: {}", error_text);
            return Err(AssistantError::BackendUnavailable(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            AssistantError::BackendUnavailable(format!("Gemini response body lost: {}", e))
        })?;

        let answer = parse_answer(&body)?;
        info!(answer_len = answer.len(), "Gemini response received");

        Ok(answer)
    }
}

/// Pull the first candidate's text out of a raw response body
fn parse_answer(body: &str) -> Result<String> {
    let parsed: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse Gemini response: {}", e);
        AssistantError::MalformedResponse(format!("Gemini parse error: {}", e))
    })?;

    let text = parsed
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.first())
        .map(|part| strip_markdown(&part.text))
        .ok_or_else(|| {
            AssistantError::MalformedResponse("No candidates in Gemini response".to_string())
        })?;

    if text.trim().is_empty() {
        return Err(AssistantError::MalformedResponse(
            "Empty response from Gemini".to_string(),
        ));
    }

    Ok(text)
}

fn strip_markdown(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '#' | '`'))
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
