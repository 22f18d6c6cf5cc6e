//! CLI exit codes and output

use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{capdec, fixture_path};

const FIXTURE: &str = "openai_capture.jsonl";

#[test]
fn missing_argument_exits_1() {
    let home = TempDir::new().unwrap();
    capdec(home.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CAPTURE_FILE"));
}

#[test]
fn missing_file_exits_1() {
    let home = TempDir::new().unwrap();
    capdec(home.path())
        .arg(home.path().join("nope.jsonl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn help_exits_0() {
    let home = TempDir::new().unwrap();
    capdec(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("capture log"));
}

#[test]
fn fixture_transcript_exits_0_despite_warnings() {
    let home = TempDir::new().unwrap();
    capdec(home.path())
        .arg(fixture_path(FIXTURE))
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning: Failed to parse line 4"))
        .stdout(predicate::str::contains("Parsed 6 events"))
        .stdout(predicate::str::contains("Type: HTTP Request"))
        .stdout(predicate::str::contains(
            "Authorization: Bearer sk-proj-... [REDACTED]",
        ))
        .stdout(predicate::str::contains("Hello! How can I help you today?"))
        .stdout(predicate::str::contains("Type: Chunked Transfer End Marker"))
        .stdout(predicate::str::contains("Failed to decompress gzip data"))
        .stdout(predicate::str::contains("Total events: 6"))
        .stdout(predicate::str::contains("READ/RECV events: 4"))
        .stdout(predicate::str::contains("WRITE/SEND events: 1"))
        .stdout(predicate::str::contains("HANDSHAKE events: 1"))
        .stdout(predicate::str::contains("0123456789SECRET").not())
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn json_format_emits_parseable_report() {
    let home = TempDir::new().unwrap();
    let output = capdec(home.path())
        .arg(fixture_path(FIXTURE))
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["total_events"], 6);
    assert_eq!(report["summary"]["malformed_lines"], 1);
    assert_eq!(report["summary"]["decompression_failures"], 1);
    assert_eq!(report["warnings"][0]["line"], 4);
    assert_eq!(report["records"][1]["kind"], "http_response");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("0123456789SECRET"));
}

#[test]
fn config_file_changes_output_format() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("capdec");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[output]\nformat = \"json\"\n").unwrap();

    capdec(home.path())
        .arg(fixture_path(FIXTURE))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn invalid_config_exits_1() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "[decode]\nredact_prefix_len = 0\n").unwrap();

    capdec(home.path())
        .arg(fixture_path(FIXTURE))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("redact_prefix_len"));
}

#[test]
fn verbose_logging_goes_to_stderr() {
    let home = TempDir::new().unwrap();
    capdec(home.path())
        .arg(fixture_path(FIXTURE))
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("decoding capture"))
        .stdout(predicate::str::contains("decoding capture").not());
}

#[test]
fn empty_log_still_prints_summary() {
    let home = TempDir::new().unwrap();
    let log = home.path().join("empty.jsonl");
    std::fs::write(&log, "").unwrap();

    capdec(home.path())
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 0 events"))
        .stdout(predicate::str::contains("Total events: 0"));
}
