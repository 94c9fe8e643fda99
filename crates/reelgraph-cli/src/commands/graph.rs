//! Graph command implementation.

use crate::cli::TranscriptArgs;
use crate::commands::load_transcript;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;

/// Execute the graph command.
pub async fn execute_graph(
    args: TranscriptArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<()> {
    load_transcript(session, &args.transcript).await?;

    let graph = session.graph().ok_or(CliError::NoTranscript)?;
    println!("{}", formatter.graph(graph)?);

    Ok(())
}
