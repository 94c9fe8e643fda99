//! Error types for the Synthesizer

use reelgraph_extractor::ParseError;
use reelgraph_llm::{GenerationError, TemplateError};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while summarizing or answering
#[derive(Error, Debug)]
pub enum SynthesizerError {
    /// Template/variable mismatch in a generation call
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Generation provider error
    #[error("Generation failed: {0}")]
    Llm(String),

    /// Entity selection output was not the required JSON shape
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A generation call exceeded its time budget
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<GenerationError> for SynthesizerError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Template(t) => SynthesizerError::Template(t),
            GenerationError::Provider(source) => SynthesizerError::Llm(source.to_string()),
        }
    }
}
