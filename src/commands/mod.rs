//! Command handlers for the capdec CLI.

pub mod decode;

use anyhow::Result;

use capdec::cli::Cli;
use capdec::config::ColorMode;
use capdec::Config;

/// Load the configuration and apply command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.no_color {
        config.output.color = ColorMode::Never;
    }
    Ok(config)
}
