//! Capture Trace Decoder (capdec) - CLI entry point

mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use capdec::cli::Cli;

#[cfg(not(tarpaulin_include))]
fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures.
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(cli.log_level());

    if let Err(e) = commands::decode::handle(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
#[cfg(not(tarpaulin_include))]
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
