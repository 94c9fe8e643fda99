//! Reelgraph CLI library.
//!
//! Configuration, provider selection, the processing [`Session`], command
//! execution and output formatting behind the `reelgraph` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use provider::{build_client, SharedClient};
pub use session::{Exchange, Session};
