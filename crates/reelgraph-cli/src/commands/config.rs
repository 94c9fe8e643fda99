//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// `config` is the effective configuration, overrides included; `path` is
/// the file it was loaded from.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", formatter.info(&format!("Config file: {}", path.display())));
            println!("{}", show(config)?);
        }
        ConfigAction::Init { force } => {
            init(path, force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default config to {}", path.display()))
            );
        }
    }
    Ok(())
}

/// Effective configuration as TOML, with any API key masked.
fn show(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("********".to_string());
    }
    shown.to_toml()
}

/// Write the default configuration to `path`.
fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }
    Config::default().save_to(path)
}
