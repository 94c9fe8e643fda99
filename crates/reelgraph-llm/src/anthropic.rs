//! Anthropic Messages API provider
//!
//! Talks to `/v1/messages` with an `x-api-key` header. The reply is a list of
//! content blocks; the text of the first text block is the completion.

use crate::http::{http_client, post_json};
use crate::LlmError;
use async_trait::async_trait;
use reelgraph_domain::traits::LlmProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Messages API version sent with every request
pub const API_VERSION: &str = "2023-06-01";

/// Default timeout for a single HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Messages API provider
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: u32,
    client: reqwest::Client,
    max_attempts: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    /// Create a provider for `model` at `endpoint`, authenticated with `api_key`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_attempts: 1,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    /// Set the number of attempts per call (1 = no retry)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn request<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        }
    }
}

fn first_text(response: MessagesResponse) -> Result<String, LlmError> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| LlmError::InvalidResponse("No text content returned".to_string()))
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.endpoint);
        let headers = [
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", API_VERSION),
        ];
        let response: MessagesResponse = post_json(
            &self.client,
            &url,
            &self.request(prompt),
            &headers,
            &self.model,
            self.max_attempts,
        )
        .await?;
        first_text(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
