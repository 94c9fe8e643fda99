//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Lines starting with `:` are commands; every other line is a question
//! about the loaded transcript.

use crate::commands::{self, process};
use crate::config::{home_dir, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run the interactive REPL.
pub async fn run_repl(
    session: &mut Session,
    config: &Config,
    formatter: &Formatter,
    transcript: Option<&Path>,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("Reelgraph REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    // Initialize readline editor
    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;
    if let Err(e) = editor.set_max_history_size(config.settings.history_size) {
        debug!("Keeping default history size: {}", e);
    }

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    if let Some(path) = transcript {
        run_line(&ReplCommand::Load(path.to_path_buf()), session, formatter).await;
    }

    loop {
        let prompt = if session.graph().is_some() {
            "reelgraph> "
        } else {
            "reelgraph (no transcript)> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(cmd) => run_line(&cmd, session, formatter).await,
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Load(PathBuf),
    Summary,
    Entities,
    History,
    Ask(String),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match line {
        "exit" | "quit" | "q" | ":exit" | ":quit" | ":q" => return Ok(ReplCommand::Exit),
        "help" | "?" | ":help" => return Ok(ReplCommand::Help),
        _ => {}
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(ReplCommand::Ask(line.to_string()));
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        "load" if rest.is_empty() => Err(CliError::InvalidInput(
            "Usage: :load <file>".to_string(),
        )),
        "load" => Ok(ReplCommand::Load(PathBuf::from(rest))),
        "summary" => Ok(ReplCommand::Summary),
        "entities" => Ok(ReplCommand::Entities),
        "history" => Ok(ReplCommand::History),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: :{}. Type 'help' for available commands.",
            name
        ))),
    }
}

/// Run one command, reporting failures without leaving the loop.
async fn run_line(cmd: &ReplCommand, session: &mut Session, formatter: &Formatter) {
    match execute_repl_command(cmd, session, formatter).await {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
    }
}

/// Execute a REPL command, returning what to print.
async fn execute_repl_command(
    cmd: &ReplCommand,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<Option<String>> {
    let output = match cmd {
        ReplCommand::Exit => None,
        ReplCommand::Help => Some(help_text(formatter)),
        ReplCommand::Load(path) => {
            println!("{}", formatter.info(&format!("Processing {}...", path.display())));
            commands::load_transcript(session, path).await?;
            Some(process::report(session, formatter)?)
        }
        ReplCommand::Summary => Some(
            session
                .summary()
                .ok_or(CliError::NoTranscript)?
                .to_string(),
        ),
        ReplCommand::Entities => {
            let graph = session.graph().ok_or(CliError::NoTranscript)?;
            Some(formatter.entities(graph)?)
        }
        ReplCommand::History => Some(formatter.history(session.history())?),
        ReplCommand::Ask(question) => {
            let answer = session.ask(question).await?;
            Some(formatter.answer(question, &answer)?)
        }
    };
    Ok(output)
}

fn get_history_path() -> Result<PathBuf> {
    let dir = home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn help_text(formatter: &Formatter) -> String {
    [
        formatter.info("Available commands:"),
        String::new(),
        "  :load <file>        - Process a transcript, replacing the current graph".to_string(),
        "  :summary            - Show the summary of the current transcript".to_string(),
        "  :entities           - List the entities in the current graph".to_string(),
        "  :history            - Show questions asked about this transcript".to_string(),
        "  <question>          - Ask a question about the current transcript".to_string(),
        "  help, ?             - Show this help".to_string(),
        "  exit, quit, q       - Exit REPL".to_string(),
        String::new(),
    ]
    .join("\n")
}
