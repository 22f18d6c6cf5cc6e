//! Decode command handler

use std::io::{self, Write};

use anyhow::{Context, Result};

use capdec::cli::Cli;
use capdec::config::OutputFormat;
use capdec::report::render;
use capdec::{Session, Theme};

use super::resolve_config;

/// Decode the capture log and print the transcript or JSON report.
///
/// Per-event problems are part of the output; only a missing file or an
/// unreadable configuration is an error.
#[cfg(not(tarpaulin_include))]
pub fn handle(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let report = Session::new(&config)
        .parallel(cli.parallel)
        .run_file(&cli.capture_file)?;

    let output = match config.output.format {
        OutputFormat::Text => render::render_text(&report, &Theme::resolve(config.output.color)),
        OutputFormat::Json => {
            let mut json = render::render_json(&report).context("Failed to serialize report")?;
            json.push('\n');
            json
        }
    };

    let mut stdout = io::stdout().lock();
    match stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write output"),
    }
}
