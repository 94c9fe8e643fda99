//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/generate` endpoint
//! - Configurable endpoint, model and sampling temperature
//! - Optional retries with exponential backoff (off by default)
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use reelgraph_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1")
//!     .with_temperature(0.2);
//! ```

use crate::http::{http_client, post_json};
use crate::LlmError;
use async_trait::async_trait;
use reelgraph_domain::traits::LlmProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single HTTP request (5 minutes; local models are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts per call (no retry)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Ollama API provider for local LLM inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    temperature: Option<f32>,
    client: reqwest::Client,
    max_attempts: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: None,
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Create a new Ollama provider at `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the number of attempts per call (1 = no retry)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    fn request<'a>(&'a self, prompt: &'a str) -> OllamaGenerateRequest<'a> {
        OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.temperature.map(|temperature| OllamaOptions { temperature }),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let reply: OllamaGenerateResponse = post_json(
            &self.client,
            &url,
            &self.request(prompt),
            &[],
            &self.model,
            self.max_attempts,
        )
        .await?;
        Ok(reply.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3.1");
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model_name(), "llama3.1");
        assert_eq!(provider.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_max_attempts_never_zero() {
        let provider = OllamaProvider::default_endpoint("mistral").with_max_attempts(0);
        assert_eq!(provider.max_attempts, 1);
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OllamaProvider::default_endpoint("gemma2").with_temperature(0.2);
        let body = serde_json::to_value(provider.request("hi")).unwrap();
        assert_eq!(body["model"], "gemma2");
        assert_eq!(body["prompt"], "hi");
        assert_eq!(body["stream"], false);
        assert!(body["options"]["temperature"].is_number());

        let provider = OllamaProvider::default_endpoint("gemma2");
        let body = serde_json::to_value(provider.request("hi")).unwrap();
        assert!(body.get("options").is_none());
    }

    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3.1");
        let response = provider.generate("Say 'hello' and nothing else").await.unwrap();
        assert!(!response.is_empty());
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Invalid port forces a transport error
        let provider = OllamaProvider::new("http://localhost:99999", "llama3.1");

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
