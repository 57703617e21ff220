//! `anvil config`: show the effective configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => output.print(&lookup(&config, &key)?)?,
        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                for line in listing(&config) {
                    output.print(&line)?;
                }
            }
        }
        ConfigCommands::Path => output.print(&AppConfig::config_path().display().to_string())?,
    }
    Ok(())
}

fn lookup(config: &AppConfig, key: &str) -> CliResult<String> {
    config.get(key).ok_or_else(|| CliError::ConfigError {
        message: format!(
            "unknown key '{key}' (known keys: {})",
            AppConfig::KEYS.join(", ")
        ),
        source: None,
    })
}

/// `key = value` lines after merging defaults, file and environment.
fn listing(config: &AppConfig) -> Vec<String> {
    AppConfig::KEYS
        .iter()
        .filter_map(|key| config.get(key).map(|value| format!("{key} = {value}")))
        .collect()
}
