//! CLI definitions for capdec
//!
//! Kept out of main.rs so xtask can render the man page and command
//! reference from the same definition.

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;

use crate::config::OutputFormat;

/// Build clap styles matching the transcript colors.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser, Debug)]
#[command(name = "capdec")]
#[command(about = "Decode captured TLS traffic into readable HTTP, gzip and chat content")]
#[command(
    long_about = "Capture Trace Decoder (capdec) - decode TLS capture logs.

Reads a line-delimited JSON log written by a TLS capture agent (sslsniff)
and prints one section per captured read or write: HTTP request and status
lines, selected headers, chunk framing, decompressed gzip bodies and
extracted assistant messages. Credentials in request headers are redacted.

Malformed lines and undecodable payloads are reported and skipped; the exit
code is 0 whenever the log could be read.

EXAMPLES:
    capdec capture.jsonl                   Print the transcript
    capdec capture.jsonl --format json     Emit the full report as JSON
    capdec capture.jsonl -vv               Debug logging on stderr

CONFIGURATION:
    ~/.config/capdec/config.toml           Redaction, header and output settings"
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Path to the capture log (one JSON record per line)
    #[arg(value_name = "CAPTURE_FILE")]
    pub capture_file: PathBuf,

    /// Load configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, short, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Decode events on all cores (output order is unchanged)
    #[arg(long)]
    pub parallel: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter implied by `-v` flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
