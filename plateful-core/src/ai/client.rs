//! Vision client against an OpenAI-compatible chat-completions API
//! (OpenRouter by default).
//!
//! One request per extraction: the fixed instruction, the image, and a
//! `json_schema` response format carrying the closed aggregate schema, so
//! the service is constrained to return only conforming structure.

use serde::{Deserialize, Serialize};

use super::config::VisionConfig;
use super::prompts::extract_recipe::{
    extract_recipe_schema, render_extract_recipe_prompt, EXTRACT_RECIPE_PROMPT_NAME,
};
use super::{ImageSource, VisionClient, VisionError};
use async_trait::async_trait;

pub struct OpenRouterVisionClient {
    config: VisionConfig,
    client: reqwest::Client,
}

impl OpenRouterVisionClient {
    /// Create a client from environment configuration. Fails fast when the
    /// credential is absent, before any network call is attempted.
    pub fn from_env() -> Result<Self, VisionError> {
        let config = VisionConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn new(config: VisionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { config, client }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn image_part(image: &ImageSource) -> ContentPart {
    let url = match image {
        ImageSource::Url(url) => url.clone(),
        ImageSource::Inline {
            media_type,
            data_base64,
        } => format!("data:{};base64,{}", media_type, data_base64),
    };
    ContentPart::ImageUrl {
        image_url: ImageUrl { url },
    }
}

/// Extract the upstream error message from a response body, falling back to
/// the body itself.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl VisionClient for OpenRouterVisionClient {
    async fn extract(&self, image: &ImageSource) -> Result<serde_json::Value, VisionError> {
        let request = ChatRequest {
            model: &self.config.model,
            max_tokens: 4096,
            temperature: 0.1,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: render_extract_recipe_prompt(),
                    },
                    image_part(image),
                ],
            }],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: EXTRACT_RECIPE_PROMPT_NAME,
                    strict: true,
                    schema: extract_recipe_schema(),
                },
            },
        };

        tracing::debug!(model = %self.config.model, "requesting recipe extraction");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Upstream("Extraction request timed out".to_string())
                } else {
                    VisionError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(VisionError::RateLimited { retry_after_secs });
        }

        let body = response
            .text()
            .await
            .map_err(|e| VisionError::Upstream(e.to_string()))?;

        match status.as_u16() {
            200 => {}
            401 | 403 => return Err(VisionError::Config(upstream_message(&body))),
            400 | 413 | 422 => return Err(VisionError::BadInput(upstream_message(&body))),
            _ => return Err(VisionError::Upstream(upstream_message(&body))),
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| VisionError::Upstream(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                VisionError::Upstream("Extraction service returned an empty response".to_string())
            })?;

        serde_json::from_str(&content).map_err(|e| {
            VisionError::Upstream(format!("Extraction response was not valid JSON: {}", e))
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(base_url: String) -> VisionConfig {
        VisionConfig {
            api_key: "test-key".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn returns_structured_content_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"{\"title\":\"Congee\"}"}}]}"#,
            )
            .create_async()
            .await;

        let client = OpenRouterVisionClient::new(test_config(server.url()));
        let value = client
            .extract(&ImageSource::Url("https://example.com/a.jpg".to_string()))
            .await
            .unwrap();

        assert_eq!(value["title"], "Congee");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_is_distinguishable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "12")
            .with_body(r#"{"error":{"message":"slow down"}}"#)
            .create_async()
            .await;

        let client = OpenRouterVisionClient::new(test_config(server.url()));
        let err = client
            .extract(&ImageSource::Url("https://example.com/a.jpg".to_string()))
            .await
            .unwrap_err();

        match err {
            VisionError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, Some(12));
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn bad_credential_is_a_config_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"invalid api key"}}"#)
            .create_async()
            .await;

        let client = OpenRouterVisionClient::new(test_config(server.url()));
        let err = client
            .extract(&ImageSource::Url("https://example.com/a.jpg".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, VisionError::Config(_)));
    }

    #[tokio::test]
    async fn empty_model_content_is_an_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":""}}]}"#)
            .create_async()
            .await;

        let client = OpenRouterVisionClient::new(test_config(server.url()));
        let err = client
            .extract(&ImageSource::Url("https://example.com/a.jpg".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, VisionError::Upstream(_)));
    }

    #[tokio::test]
    async fn oversized_image_is_a_bad_input_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(413)
            .with_body(r#"{"error":{"message":"image too large"}}"#)
            .create_async()
            .await;

        let client = OpenRouterVisionClient::new(test_config(server.url()));
        let err = client
            .extract(&ImageSource::Url("https://example.com/a.jpg".to_string()))
            .await
            .unwrap_err();

        match err {
            VisionError::BadInput(message) => assert!(message.contains("too large")),
            other => panic!("expected BadInput, got {:?}", other),
        }
    }
}
