//! The generation client contract
//!
//! Callers hand over a template plus named variables and get raw generated
//! text back. Rendering happens before the provider is contacted, so a
//! template/variable mismatch never costs a network call.

use crate::template::{PromptTemplate, TemplateError, Variables};
use async_trait::async_trait;
use reelgraph_domain::traits::LlmProvider;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from a generation call
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The template could not be rendered with the given variables
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The provider failed to produce a completion
    #[error("Provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Renders a template and asks a provider to complete it
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Substitute `variables` into `template` and return the generated text
    async fn generate(&self, template: &str, variables: &Variables)
        -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: GenerationClient + ?Sized> GenerationClient for Arc<T> {
    async fn generate(
        &self,
        template: &str,
        variables: &Variables,
    ) -> Result<String, GenerationError> {
        (**self).generate(template, variables).await
    }
}

/// [`GenerationClient`] backed by any [`LlmProvider`]
#[derive(Debug, Clone)]
pub struct Generator<P> {
    provider: P,
}

impl<P: LlmProvider> Generator<P> {
    /// Wrap a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: LlmProvider> GenerationClient for Generator<P> {
    async fn generate(
        &self,
        template: &str,
        variables: &Variables,
    ) -> Result<String, GenerationError> {
        let prompt = PromptTemplate::new(template).render(variables)?;
        debug!(
            model = self.provider.model_name(),
            prompt_chars = prompt.len(),
            "Sending prompt"
        );

        let response = self
            .provider
            .generate(&prompt)
            .await
            .map_err(|e| GenerationError::Provider(Box::new(e)))?;

        debug!(response_chars = response.len(), "Received completion");
        Ok(response)
    }
}
