//! Configuration management for capdec
//!
//! Configuration is optional. Every field has a default, and a missing file
//! is the same as an empty one.
//!
//! ```toml
//! [decode]
//! redact_prefix_len = 30
//! sensitive_headers = ["authorization", "x-api-key"]
//! max_decompressed_bytes = 16777216
//!
//! [output]
//! format = "text"
//! color = "auto"
//! preview_chars = 100
//! ```

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::Path;

impl Config {
    /// Load configuration from the default location, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        io::parse(contents)
    }
}
