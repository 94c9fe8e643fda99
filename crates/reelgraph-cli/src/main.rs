//! Reelgraph CLI - Build knowledge graphs from video transcripts and question them.

use clap::Parser;
use reelgraph_cli::commands;
use reelgraph_cli::repl;
use reelgraph_cli::{build_client, Cli, Command, Config, Formatter, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (log to stderr so answers own stdout)
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> reelgraph_cli::Result<()> {
    // Load config, falling back to defaults when the file is absent
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    config.apply_overrides(cli.provider.map(Into::into), cli.model, cli.endpoint);

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None => {
            let mut session = open_session(&config)?;
            repl::run_repl(&mut session, &config, &formatter, None).await?;
        }
        Some(Command::Repl(args)) => {
            let mut session = open_session(&config)?;
            repl::run_repl(&mut session, &config, &formatter, args.transcript.as_deref()).await?;
        }
        Some(Command::Process(args)) => {
            commands::execute_process(args, &mut open_session(&config)?, &formatter).await?;
        }
        Some(Command::Ask(args)) => {
            commands::execute_ask(args, &mut open_session(&config)?, &formatter).await?;
        }
        Some(Command::Graph(args)) => {
            commands::execute_graph(args, &mut open_session(&config)?, &formatter).await?;
        }
        Some(Command::Config(args)) => {
            // Config management needs no backend
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}

fn open_session(config: &Config) -> reelgraph_cli::Result<Session> {
    let client = build_client(&config.provider, config.extractor.generation_timeout())?;
    Ok(Session::new(client, config.extractor.clone()))
}
