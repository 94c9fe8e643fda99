//! Reelgraph LLM Provider Layer
//!
//! Implements the generation client contract used by the extraction and
//! query pipelines: render a template with named variables, send it to a
//! text-generation backend, return the raw text.
//!
//! # Architecture
//!
//! ```text
//! template + variables → Generator → LlmProvider → generated text
//! ```
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: OpenAI-compatible chat completions
//! - `AnthropicProvider`: Anthropic Messages API
//!
//! # Examples
//!
//! ```
//! use reelgraph_llm::{GenerationClient, Generator, MockProvider};
//! use reelgraph_llm::template::variables;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let generator = Generator::new(MockProvider::new("machine learning education"));
//! let vars = variables([("input_text", json!("Today we cover gradient descent"))]);
//! let domain = generator.generate("Text: {input_text}", &vars).await.unwrap();
//! assert_eq!(domain, "machine learning education");
//! # });
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod client;
mod http;
pub mod ollama;
pub mod openai;
pub mod template;

use async_trait::async_trait;
use reelgraph_domain::traits::LlmProvider;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use client::{GenerationClient, GenerationError, Generator};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use template::{PromptTemplate, TemplateError, Variables};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
}

#[derive(Debug)]
struct Rule {
    needle: String,
    replies: VecDeque<Reply>,
    delay: Duration,
}

impl Rule {
    /// Pop the next scripted reply; the last one repeats forever
    fn next_reply(&mut self) -> Reply {
        if self.replies.len() > 1 {
            self.replies.pop_front().unwrap_or(Reply::Fail)
        } else {
            self.replies.front().cloned().unwrap_or(Reply::Fail)
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    exact: HashMap<String, Reply>,
    rules: Vec<Rule>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls. Exact-prompt responses win; otherwise the first rule whose needle
/// occurs in the prompt answers; otherwise the default response is returned.
/// Clones share state, so a test can keep a handle for assertions.
///
/// # Examples
///
/// ```
/// use reelgraph_llm::MockProvider;
/// use reelgraph_domain::traits::LlmProvider;
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.when_contains("entity_types", r#"{"entity_types": ["concept"]}"#);
///
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(
///     provider.generate("return entity_types please").await.unwrap(),
///     r#"{"entity_types": ["concept"]}"#
/// );
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a specific response for an exact prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .exact
            .insert(prompt.into(), Reply::Text(response.into()));
    }

    /// Configure to return an error for an exact prompt
    pub fn add_error(&self, prompt: impl Into<String>) {
        self.state().exact.insert(prompt.into(), Reply::Fail);
    }

    /// Answer every prompt containing `needle` with `response`
    pub fn when_contains(&self, needle: impl Into<String>, response: impl Into<String>) {
        self.when_contains_delayed(needle, response, Duration::ZERO);
    }

    /// Like [`when_contains`](Self::when_contains), but sleep before answering
    pub fn when_contains_delayed(
        &self,
        needle: impl Into<String>,
        response: impl Into<String>,
        delay: Duration,
    ) {
        self.push_rule(needle.into(), vec![Reply::Text(response.into())], delay);
    }

    /// Answer prompts containing `needle` with `responses` in turn, repeating the last
    pub fn when_contains_sequence<I, S>(&self, needle: impl Into<String>, responses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies = responses
            .into_iter()
            .map(|r| Reply::Text(r.into()))
            .collect();
        self.push_rule(needle.into(), replies, Duration::ZERO);
    }

    /// Fail every prompt containing `needle`
    pub fn when_contains_fail(&self, needle: impl Into<String>) {
        self.push_rule(needle.into(), vec![Reply::Fail], Duration::ZERO);
    }

    fn push_rule(&self, needle: String, replies: Vec<Reply>, delay: Duration) {
        self.state().rules.push(Rule {
            needle,
            replies: replies.into(),
            delay,
        });
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// Prompts received so far that contain `needle`
    pub fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.state()
            .prompts
            .iter()
            .filter(|p| p.contains(needle))
            .cloned()
            .collect()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        self.state().prompts.clear();
    }

    fn resolve(&self, prompt: &str) -> (Reply, Duration) {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        if let Some(reply) = state.exact.get(prompt) {
            return (reply.clone(), Duration::ZERO);
        }
        if let Some(rule) = state.rules.iter_mut().find(|r| prompt.contains(&r.needle)) {
            let delay = rule.delay;
            return (rule.next_reply(), delay);
        }
        (Reply::Text(self.default_response.clone()), Duration::ZERO)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let (reply, delay) = self.resolve(prompt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
