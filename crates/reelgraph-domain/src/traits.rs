//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the domain and its external
//! collaborators. Implementations live in other crates.

use crate::Segment;
use async_trait::async_trait;

/// Trait for text-generation providers
///
/// Implemented by the infrastructure layer (reelgraph-llm). A provider takes
/// a fully rendered prompt and returns the raw generated text; it makes no
/// promise that the text is valid JSON.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a completion for a rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model behind this provider, for logging
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for splitting source text into bounded-size segments
///
/// Implemented by the application layer (reelgraph-extractor). Segments are
/// returned in source order with consecutive indices and no overlap.
pub trait Chunker {
    /// Split `text` into segments of at most `max_size` characters
    fn split(&self, text: &str, max_size: usize) -> Vec<Segment>;
}
