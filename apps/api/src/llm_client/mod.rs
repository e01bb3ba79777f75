/// LLM Client: the single point of entry for all Anthropic API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Handlers reach it through the `TextGenerator` trait carried in `AppState`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::note::Prompt;

pub mod prompts;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Immutable generation settings, built once at startup from `Config`.
#[derive(Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub api_url: String,
    /// Upper bound on a single outbound call, connect through body.
    pub request_timeout: Duration,
    /// Extra attempts for transient failures. 0 = single shot.
    pub max_retries: u32,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected (status {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned no text content")]
    EmptyContent,
}

impl LlmError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(e)
        } else {
            LlmError::Http(e)
        }
    }

    /// Transport failures, 429 and 5xx may succeed on a later attempt.
    fn is_transient(&self) -> bool {
        match self {
            LlmError::Timeout(_) | LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Caller-facing text. Never carries the credential or provider payloads.
    pub fn public_message(&self) -> &'static str {
        match self {
            LlmError::EmptyPrompt => "Cannot generate a note from an empty prompt",
            LlmError::Timeout(_) => "The generation service timed out",
            LlmError::Http(_) => "The generation service could not be reached",
            LlmError::Unauthorized { .. } => {
                "The generation service rejected the configured credentials"
            }
            LlmError::Api { .. } => "The generation service returned an error",
            LlmError::Parse(_) | LlmError::EmptyContent => {
                "The generation service returned an unexpected response"
            }
        }
    }
}

/// Normalized outcome of one generation call. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Succeeded { content: String },
    Failed { message: String },
}

impl GenerationResult {
    /// Logs the full error server-side and keeps only the sanitized message.
    fn from_outcome(outcome: Result<String, LlmError>) -> Self {
        match outcome {
            Ok(content) => GenerationResult::Succeeded { content },
            Err(e) => {
                error!(error = %e, "Generation request failed");
                GenerationResult::Failed {
                    message: e.public_message().to_string(),
                }
            }
        }
    }
}

/// Anything that can turn a prompt into generated text.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so handlers never
/// depend on the concrete HTTP client.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> GenerationResult;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API: one single-turn request per prompt.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: Arc<GenerationConfig>,
}

impl LlmClient {
    pub fn new(config: GenerationConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends the prompt as the only user message and returns the full response.
    /// Transient failures are retried up to `max_retries` times with exponential backoff.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_output_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&request_body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    // Exponential backoff: 1s, 2s, 4s
                    let delay = Duration::from_millis(1000 * 2u64.pow((attempt - 1).min(5)));
                    warn!(
                        "LLM call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request_body: &AnthropicRequest<'_>) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(LlmError::from_transport)?;

        if !status.is_success() {
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized {
                    status: status.as_u16(),
                    message,
                },
                _ => LlmError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let llm_response: LlmResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(llm_response)
    }

    async fn generate_text(&self, prompt: &Prompt) -> Result<String, LlmError> {
        if prompt.is_empty() {
            return Err(LlmError::EmptyPrompt);
        }
        let response = self.call(prompt.as_str()).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &Prompt) -> GenerationResult {
        GenerationResult::from_outcome(self.generate_text(prompt).await)
    }
}
