//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use reelgraph_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "REELGRAPH_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Generation backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Pipeline tuning
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which generation backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
}

/// Generation backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Backend kind
    pub kind: ProviderKind,

    /// Base URL; the backend's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name
    pub model: String,

    /// API key for hosted backends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion length limit (hosted backends)
    pub max_tokens: u32,

    /// Attempts per call; 1 means no retry
    pub max_attempts: u32,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// REPL history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text and tables
    Text,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(home_dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.extractor.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(
        &mut self,
        kind: Option<ProviderKind>,
        model: Option<String>,
        endpoint: Option<String>,
    ) {
        if let Some(kind) = kind {
            self.provider.kind = kind;
        }
        if let Some(model) = model {
            self.provider.model = model;
        }
        if let Some(endpoint) = endpoint {
            self.provider.endpoint = Some(endpoint);
        }
    }
}

impl ProviderConfig {
    /// The configured API key, falling back to [`API_KEY_ENV`].
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            endpoint: None,
            model: "llama3.1".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 4096,
            max_attempts: 1,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
            history_size: 1000,
        }
    }
}

/// The `~/.reelgraph` directory.
pub fn home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".reelgraph"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_history_size() -> usize {
    1000
}
