use anyhow::{Context, Result};

use crate::llm_client::WireShape;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_base: String,
    /// Which request shape the model adapter speaks. Fixed for the lifetime
    /// of the client; see `llm_client::OpenAiClient`.
    pub wire_shape: WireShape,
    pub rust_log: String,
}

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let wire_shape = match std::env::var("OPENAI_LEGACY_COMPLETIONS").as_deref() {
            Ok("1") | Ok("true") => WireShape::LegacyCompletions,
            _ => WireShape::ChatCompletions,
        };

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_base: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            wire_shape,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
