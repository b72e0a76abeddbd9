//! Model invocation adapter: the single point of entry for all LLM calls.
//!
//! No other module talks to the completion API directly; the analysis
//! orchestrator depends only on the [`ModelInvoker`] trait, which tests
//! stub out. `OpenAiClient` is the production implementation and wraps an
//! OpenAI-compatible endpoint.
//!
//! The API has two incompatible request shapes (the modern chat-completions
//! endpoint and the legacy completions endpoint). The shape is selected once
//! at construction as a [`WireFormat`] strategy object; callers see one
//! stable `invoke` signature and never branch on the shape per call.
//!
//! There is no built-in retry. Transport, auth, and rate-limit failures
//! propagate immediately as [`LlmError`]; the caller owns retry policy.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One message in a chat exchange.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling and sizing parameters for a single invocation.
#[derive(Debug, Clone)]
pub struct InvocationParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 1500,
        }
    }
}

/// The model invocation seam. Production code uses [`OpenAiClient`]; tests
/// substitute a stub returning canned responses or errors.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Sends one request and returns the raw text of the first completion.
    /// No partial responses: any failure surfaces as an error.
    async fn invoke(
        &self,
        messages: &[ChatMessage],
        params: &InvocationParams,
    ) -> Result<String, LlmError>;
}

/// Which request shape the adapter speaks. Resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireShape {
    ChatCompletions,
    LegacyCompletions,
}

/// Strategy object encapsulating one request shape: endpoint, request body,
/// and where the completion text lives in the response.
trait WireFormat: Send + Sync {
    fn endpoint(&self, api_base: &str) -> String;
    fn request_body(&self, messages: &[ChatMessage], params: &InvocationParams)
        -> serde_json::Value;
    fn completion_text(&self, response: &serde_json::Value) -> Option<String>;
}

struct ChatCompletionsWire;

impl WireFormat for ChatCompletionsWire {
    fn endpoint(&self, api_base: &str) -> String {
        format!("{api_base}/chat/completions")
    }

    fn request_body(
        &self,
        messages: &[ChatMessage],
        params: &InvocationParams,
    ) -> serde_json::Value {
        json!({
            "model": params.model,
            "messages": messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        })
    }

    fn completion_text(&self, response: &serde_json::Value) -> Option<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
    }
}

struct LegacyCompletionsWire;

impl WireFormat for LegacyCompletionsWire {
    fn endpoint(&self, api_base: &str) -> String {
        format!("{api_base}/completions")
    }

    fn request_body(
        &self,
        messages: &[ChatMessage],
        params: &InvocationParams,
    ) -> serde_json::Value {
        // The legacy endpoint takes a single prompt string; chat roles are
        // flattened into labeled sections.
        let prompt = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        json!({
            "model": params.model,
            "prompt": prompt,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        })
    }

    fn completion_text(&self, response: &serde_json::Value) -> Option<String> {
        response["choices"][0]["text"].as_str().map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Production model client over an OpenAI-compatible HTTP API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    wire: Box<dyn WireFormat>,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_shape(
            api_key,
            "https://api.openai.com/v1".to_string(),
            WireShape::ChatCompletions,
        )
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_shape(
            config.openai_api_key.clone(),
            config.openai_api_base.clone(),
            config.wire_shape,
        )
    }

    pub fn with_shape(api_key: String, api_base: String, shape: WireShape) -> Self {
        let wire: Box<dyn WireFormat> = match shape {
            WireShape::ChatCompletions => Box::new(ChatCompletionsWire),
            WireShape::LegacyCompletions => Box::new(LegacyCompletionsWire),
        };
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            wire,
        }
    }
}

#[async_trait]
impl ModelInvoker for OpenAiClient {
    async fn invoke(
        &self,
        messages: &[ChatMessage],
        params: &InvocationParams,
    ) -> Result<String, LlmError> {
        let body = self.wire.request_body(messages, params);

        let response = self
            .client
            .post(self.wire.endpoint(&self.api_base))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the API's own message when the error body is well-formed
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: serde_json::Value = response.json().await?;
        let text = self
            .wire
            .completion_text(&value)
            .ok_or(LlmError::EmptyContent)?;

        debug!(model = %params.model, chars = text.len(), "model invocation succeeded");

        Ok(text)
    }
}
