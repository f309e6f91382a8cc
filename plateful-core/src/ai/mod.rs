//! Vision-model abstraction for recipe extraction.
//!
//! A trait-based seam over the external structured-output vision service,
//! with a real OpenRouter-backed client and a fake for tests.

mod client;
pub mod config;
mod fake;
pub mod prompts;

pub use client::OpenRouterVisionClient;
pub use config::{ConfigError, VisionConfig};
pub use fake::FakeVisionClient;

use async_trait::async_trait;
use thiserror::Error;

/// Error taxonomy for the vision extraction call.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Missing or rejected credential / model id. Fatal, never retried.
    #[error("Vision service not configured: {0}")]
    Config(String),

    /// The input image itself was malformed or oversized.
    #[error("Invalid input image: {0}")]
    BadInput(String),

    /// Upstream rate limiting. The caller owns the retry policy.
    #[error("Vision service rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other upstream failure, including an empty response and timeouts.
    #[error("Vision service error: {0}")]
    Upstream(String),
}

impl From<ConfigError> for VisionError {
    fn from(e: ConfigError) -> Self {
        VisionError::Config(e.to_string())
    }
}

/// Reference to the image being analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A durable URL to a previously-uploaded image.
    Url(String),
    /// Inline payload, base64-encoded.
    Inline {
        media_type: String,
        data_base64: String,
    },
}

/// Trait for structured-output vision clients.
///
/// Implementations issue one request carrying the extraction instruction and
/// the machine-checkable output-shape contract, and return the service's raw
/// structured JSON. No automatic retries.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Extract a candidate recipe aggregate from an image.
    async fn extract(&self, image: &ImageSource) -> Result<serde_json::Value, VisionError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
