//! Ask command implementation.

use crate::cli::AskArgs;
use crate::commands::load_transcript;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;

/// Execute the ask command.
pub async fn execute_ask(args: AskArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    load_transcript(session, &args.transcript).await?;

    let answer = session.ask(&args.question).await?;
    println!("{}", formatter.answer(&args.question, &answer)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use crate::session::tests::scripted_session;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ask_records_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lecture.txt");
        fs::write(&path, "Gradient descent minimizes the loss function.").unwrap();

        let (mut session, provider) = scripted_session();
        let args = AskArgs {
            transcript: path,
            question: "What does gradient descent do?".to_string(),
        };
        execute_ask(args, &mut session, &Formatter::new(OutputFormat::Json, false))
            .await
            .unwrap();

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].answer, "It minimizes the loss.");
        assert_eq!(provider.prompts_containing("You answer questions about a video").len(), 1);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lecture.txt");
        fs::write(&path, "Gradient descent minimizes the loss function.").unwrap();

        let (mut session, _provider) = scripted_session();
        let args = AskArgs {
            transcript: path,
            question: "  ".to_string(),
        };
        let result =
            execute_ask(args, &mut session, &Formatter::new(OutputFormat::Text, false)).await;
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
