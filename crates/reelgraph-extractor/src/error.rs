//! Error types for the Extractor

use reelgraph_llm::{GenerationError, TemplateError};
use std::time::Duration;
use thiserror::Error;

/// Generated output did not have the required strict-JSON shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Output is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Output is valid JSON of the wrong shape
    #[error("Unexpected JSON shape: {0}")]
    UnexpectedShape(String),
}

/// Errors that can occur during graph construction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Template/variable mismatch in a generation call
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Generation provider error
    #[error("Generation failed: {0}")]
    Llm(String),

    /// Generated output failed strict parsing at a step with no fallback
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A generation call exceeded its time budget
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    /// Nothing to process
    #[error("Transcript is empty")]
    EmptyInput,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<GenerationError> for ExtractorError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Template(t) => ExtractorError::Template(t),
            GenerationError::Provider(source) => ExtractorError::Llm(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelgraph_llm::LlmError;

    #[test]
    fn test_provider_error_message_is_not_doubled() {
        let source = GenerationError::Provider(Box::new(LlmError::Other("Mock error".to_string())));
        let error = ExtractorError::from(source);

        assert!(matches!(error, ExtractorError::Llm(_)));
        assert_eq!(error.to_string(), "Generation failed: LLM error: Mock error");
    }
}
