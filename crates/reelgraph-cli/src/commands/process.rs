//! Process command implementation.

use crate::cli::TranscriptArgs;
use crate::commands::load_transcript;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;

/// Execute the process command.
pub async fn execute_process(
    args: TranscriptArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<()> {
    load_transcript(session, &args.transcript).await?;
    println!("{}", report(session, formatter)?);
    Ok(())
}

/// Processing report for the session's current transcript.
pub fn report(session: &Session, formatter: &Formatter) -> Result<String> {
    let processed = session.processed().ok_or(CliError::NoTranscript)?;
    formatter.processed(processed, session.summary().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::session::tests::scripted_session;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_process_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lecture.txt");
        fs::write(&path, "Gradient descent minimizes the loss function.").unwrap();

        let (mut session, _provider) = scripted_session();
        load_transcript(&mut session, &path).await.unwrap();

        let formatter = Formatter::new(OutputFormat::Text, false);
        let report = report(&session, &formatter).unwrap();
        assert!(report.contains("✓ Domain: optimization"));
        assert!(report.contains("Graph: 2 nodes, 1 edges"));
        assert!(report.ends_with("A short summary."));
    }

    #[test]
    fn test_report_without_transcript() {
        let (session, _provider) = scripted_session();
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert!(matches!(
            report(&session, &formatter),
            Err(CliError::NoTranscript)
        ));
    }
}
