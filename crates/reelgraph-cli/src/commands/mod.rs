//! Command implementations.

pub mod ask;
pub mod config;
pub mod graph;
pub mod process;

pub use self::ask::execute_ask;
pub use self::config::execute_config;
pub use self::graph::execute_graph;
pub use self::process::execute_process;

use crate::error::{CliError, Result};
use crate::session::Session;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Path that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// Read a transcript, returning its display name and text.
pub fn read_transcript(path: &Path) -> Result<(String, String)> {
    if path == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(("<stdin>".to_string(), buffer));
    }

    let text = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Cannot read transcript {}: {}", path.display(), e))
    })?;
    Ok((path.display().to_string(), text))
}

/// Read and process a transcript into `session`.
pub async fn load_transcript(session: &mut Session, path: &Path) -> Result<()> {
    let (source, text) = read_transcript(path)?;
    session.process(&source, &text).await?;
    Ok(())
}
