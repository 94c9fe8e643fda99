//! OpenAI-compatible chat completions provider
//!
//! Works with any server exposing `/v1/chat/completions` (hosted OpenAI,
//! vLLM, LM Studio, llama.cpp server). Requires an API key for hosted models.

use crate::http::{http_client, post_json};
use crate::LlmError;
use async_trait::async_trait;
use reelgraph_domain::traits::LlmProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default timeout for a single HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Chat-completions provider
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
    max_tokens: u32,
    client: reqwest::Client,
    max_attempts: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider for `model` at `endpoint`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_attempts: 1,
        }
    }

    /// Set the bearer token
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
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

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn first_choice(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No completion choices returned".to_string()))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let bearer = self.api_key.as_ref().map(|key| format!("Bearer {}", key));
        let headers: Vec<(&'static str, &str)> = bearer
            .as_deref()
            .map(|value| ("authorization", value))
            .into_iter()
            .collect();
        let response: ChatResponse = post_json(
            &self.client,
            &url,
            &self.request(prompt),
            &headers,
            &self.model,
            self.max_attempts,
        )
        .await?;
        first_choice(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new(DEFAULT_ENDPOINT, "gpt-4o-mini")
            .with_temperature(0.2)
            .with_max_tokens(512);
        let body = serde_json::to_value(provider.request("summarize")).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "summarize");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_first_choice_extracts_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"machine learning"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), "machine learning");
    }

    #[test]
    fn test_first_choice_empty() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let provider = OpenAiProvider::new("http://localhost:99999", "gpt-4o-mini").with_api_key("k");
        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
