//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of leading segments used for discovery and extraction
pub const DEFAULT_SEGMENT_CAP: usize = 20;

/// Number of novelty-seeking entity type expansion rounds
pub const DEFAULT_EXPANSION_ROUNDS: usize = 7;

/// Text chunking strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Paragraphs, then lines, then sentences, then words
    #[default]
    Recursive,
    /// Split by paragraphs (double newlines)
    ByParagraph,
    /// Split at sentence boundaries
    BySentence,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum segment size (characters)
    pub max_segment_size: usize,

    /// Text chunking strategy
    pub chunk_strategy: ChunkStrategy,

    /// Only the first `segment_cap` segments are processed
    pub segment_cap: usize,

    /// Entity type expansion rounds after the initial discovery call
    pub expansion_rounds: usize,

    /// Feed the deduplicated vocabulary to extraction instead of the raw one
    pub dedupe_entity_types: bool,

    /// Maximum time for a single generation call (seconds)
    pub generation_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_segment_size == 0 {
            return Err("max_segment_size must be greater than 0".to_string());
        }
        if self.segment_cap == 0 {
            return Err("segment_cap must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_segment_size: 1_600,
            chunk_strategy: ChunkStrategy::Recursive,
            segment_cap: DEFAULT_SEGMENT_CAP,
            expansion_rounds: DEFAULT_EXPANSION_ROUNDS,
            dedupe_entity_types: false,
            generation_timeout_secs: 300,
        }
    }
}
