//! Vision client configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model to use. Must support image input and structured output.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default request timeout in seconds. The extraction call must never hang a
/// request indefinitely.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Vision client configuration.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// API key for OpenRouter.
    pub api_key: String,
    /// Model name (e.g. "openai/gpt-4o-mini").
    pub model: String,
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// Upper bound on a single extraction request.
    pub timeout: Duration,
}

impl VisionConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENROUTER_API_KEY`: API key for OpenRouter
    ///
    /// Optional:
    /// - `PLATEFUL_AI_MODEL`: Model name (default: "openai/gpt-4o-mini")
    /// - `PLATEFUL_AI_BASE_URL`: API base URL (default: OpenRouter)
    /// - `PLATEFUL_AI_TIMEOUT_SECS`: Request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let model = env::var("PLATEFUL_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("PLATEFUL_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("PLATEFUL_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
