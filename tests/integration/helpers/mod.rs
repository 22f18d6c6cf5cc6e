//! Test helper utilities

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// The capdec binary with colors off and an isolated home directory.
pub fn capdec(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("capdec").expect("capdec binary");
    cmd.env("NO_COLOR", "1")
        .env("HOME", home)
        .env_remove("RUST_LOG");
    cmd
}
