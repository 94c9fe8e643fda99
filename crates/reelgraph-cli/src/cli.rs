//! CLI command definitions and argument parsing.

use crate::config::{OutputFormat, ProviderKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelgraph - Build a knowledge graph from a video transcript and question it.
#[derive(Debug, Parser)]
#[command(name = "reelgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Generation backend, overriding the config file
    #[arg(long, value_enum, global = true)]
    pub provider: Option<CliProvider>,

    /// Model name, overriding the config file
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Text and tables (default)
    Text,
    /// JSON format
    Json,
}

/// Generation backend options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliProvider {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible API
    Openai,
    /// Anthropic Messages API
    Anthropic,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the graph for a transcript and print its summary
    Process(TranscriptArgs),

    /// Build the graph for a transcript and answer one question
    Ask(AskArgs),

    /// Build the graph for a transcript and print it
    Graph(TranscriptArgs),

    /// Enter interactive REPL mode
    Repl(ReplArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// A transcript to read; `-` reads stdin.
#[derive(Debug, Parser)]
pub struct TranscriptArgs {
    /// Transcript file
    pub transcript: PathBuf,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Transcript file
    pub transcript: PathBuf,

    /// Question to answer
    pub question: String,
}

/// Arguments for the repl command.
#[derive(Debug, Parser)]
pub struct ReplArgs {
    /// Transcript to process before the first prompt
    pub transcript: Option<PathBuf>,
}

/// Arguments for config management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl From<CliProvider> for ProviderKind {
    fn from(provider: CliProvider) -> Self {
        match provider {
            CliProvider::Ollama => ProviderKind::Ollama,
            CliProvider::Openai => ProviderKind::OpenAi,
            CliProvider::Anthropic => ProviderKind::Anthropic,
        }
    }
}
