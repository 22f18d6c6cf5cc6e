//! Configuration loading tests

use std::io::Write;

use capdec::config::{ColorMode, OutputFormat};
use capdec::Config;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_fills_in_defaults() {
    let file = config_file("[decode]\nredact_prefix_len = 12\n");
    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.decode.redact_prefix_len, 12);
    assert_eq!(config.decode.sensitive_headers, Config::default().decode.sensitive_headers);
    assert_eq!(config.output, Config::default().output);
}

#[test]
fn output_section_parses_enums() {
    let file = config_file("[output]\nformat = \"json\"\ncolor = \"never\"\npreview_chars = 20\n");
    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.output.color, ColorMode::Never);
    assert_eq!(config.output.preview_chars, 20);
}

#[test]
fn zero_limits_are_rejected() {
    let file = config_file("[decode]\nmax_decompressed_bytes = 0\n");
    let err = Config::load_from(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("max_decompressed_bytes"));
}

#[test]
fn unknown_format_is_rejected() {
    let file = config_file("[output]\nformat = \"yaml\"\n");
    assert!(Config::load_from(file.path()).is_err());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = Config::load_from(std::path::Path::new("/no/such/capdec.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
