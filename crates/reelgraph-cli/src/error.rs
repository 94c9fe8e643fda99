//! Error types for the CLI application.

use reelgraph_extractor::ExtractorError;
use reelgraph_synthesizer::SynthesizerError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transcript processing failed
    #[error("Cannot process transcript: {0}")]
    Process(#[from] ExtractorError),

    /// Summarizing a freshly built graph failed
    #[error("Cannot process transcript: {0}")]
    Summary(SynthesizerError),

    /// Answer generation failed
    #[error("Cannot answer: {0}")]
    Answer(#[from] SynthesizerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No transcript has been processed in this session
    #[error("No transcript loaded. Use ':load <file>' first.")]
    NoTranscript,
}
