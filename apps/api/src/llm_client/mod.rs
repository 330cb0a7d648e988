//! Model Gateway — the single point of entry for all Gemini API calls in JobBot.
//!
//! Interview and feedback code depend on the `ModelGateway` trait only; the
//! concrete `GeminiClient` is wired in `main` and a scripted double is used in tests.
//! Calls are never retried here. Failures go back to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Model API rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("Model API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Model API call timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned empty content")]
    EmptyContent,
}

impl GatewayError {
    /// True when resubmitting the same request cannot succeed.
    pub fn is_fatal(&self) -> bool {
        match self {
            GatewayError::Unauthorized(_) => true,
            GatewayError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Http(e)
        }
    }
}

/// A stateless text-in, text-out call to a generative model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini `generateContent` client. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model_id)
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String, GatewayError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model_id))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Model call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                model_id, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or(GatewayError::EmptyContent)
    }
}

/// Maps a non-success HTTP status and its body to a `GatewayError`.
fn classify_failure(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<GeminiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => GatewayError::Unauthorized(message),
        429 => GatewayError::QuotaExhausted(message),
        408 | 504 => GatewayError::Timeout,
        _ => GatewayError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
