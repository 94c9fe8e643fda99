//! Generation backend selection.

use crate::config::{ProviderConfig, ProviderKind, API_KEY_ENV};
use crate::error::{CliError, Result};
use reelgraph_llm::{
    anthropic, ollama, openai, AnthropicProvider, GenerationClient, Generator, OllamaProvider,
    OpenAiProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Headroom added to the HTTP timeout over the per-call generation timeout.
const HTTP_GRACE: Duration = Duration::from_secs(5);

/// Shared handle to whichever backend the configuration selects.
pub type SharedClient = Arc<dyn GenerationClient>;

/// Build the generation client described by `config`.
///
/// `timeout` is the per-call generation timeout. HTTP requests are allowed
/// slightly longer, so a slow call surfaces as that timeout rather than a
/// transport error.
pub fn build_client(config: &ProviderConfig, timeout: Duration) -> Result<SharedClient> {
    if config.model.trim().is_empty() {
        return Err(CliError::Config("provider.model must be set".to_string()));
    }
    let timeout = http_timeout(timeout);

    match config.kind {
        ProviderKind::Ollama => {
            let endpoint = config.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
            info!("Using Ollama model '{}' at {}", config.model, endpoint);

            let provider = OllamaProvider::new(endpoint, config.model.as_str())
                .with_temperature(config.temperature)
                .with_timeout(timeout)
                .with_max_attempts(config.max_attempts);
            Ok(Arc::new(Generator::new(provider)))
        }
        ProviderKind::OpenAi => {
            let endpoint = config.endpoint.as_deref().unwrap_or(openai::DEFAULT_ENDPOINT);
            let api_key = required_api_key(config, "openai")?;
            info!("Using OpenAI-compatible model '{}' at {}", config.model, endpoint);

            let provider = OpenAiProvider::new(endpoint, config.model.as_str())
                .with_api_key(api_key)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens)
                .with_timeout(timeout)
                .with_max_attempts(config.max_attempts);
            Ok(Arc::new(Generator::new(provider)))
        }
        ProviderKind::Anthropic => {
            let endpoint = config.endpoint.as_deref().unwrap_or(anthropic::DEFAULT_ENDPOINT);
            let api_key = required_api_key(config, "anthropic")?;
            info!("Using Anthropic model '{}' at {}", config.model, endpoint);

            let provider = AnthropicProvider::new(endpoint, config.model.as_str(), api_key)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens)
                .with_timeout(timeout)
                .with_max_attempts(config.max_attempts);
            Ok(Arc::new(Generator::new(provider)))
        }
    }
}

fn http_timeout(generation_timeout: Duration) -> Duration {
    generation_timeout + HTTP_GRACE
}

fn required_api_key(config: &ProviderConfig, kind: &str) -> Result<String> {
    config.resolve_api_key().ok_or_else(|| {
        CliError::Config(format!(
            "the {} provider needs provider.api_key or {}",
            kind, API_KEY_ENV
        ))
    })
}
