//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::decode::gzip::DEFAULT_MAX_DECOMPRESSED;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Decoder configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecodeConfig {
    /// Characters of a sensitive header line shown before the redaction marker
    #[serde(default = "default_redact_prefix_len")]
    pub redact_prefix_len: usize,
    /// Request headers whose values are redacted (case-insensitive names)
    #[serde(default = "default_sensitive_headers")]
    pub sensitive_headers: Vec<String>,
    /// Response header prefixes shown in the transcript (case-insensitive)
    #[serde(default = "default_interesting_headers")]
    pub interesting_headers: Vec<String>,
    /// Upper bound on inflated gzip output
    #[serde(default = "default_max_decompressed_bytes")]
    pub max_decompressed_bytes: u64,
    /// Report declared vs. reconstructed length differences
    #[serde(default = "default_flag_length_mismatch")]
    pub flag_length_mismatch: bool,
}

pub fn default_redact_prefix_len() -> usize {
    30
}

pub fn default_sensitive_headers() -> Vec<String> {
    vec![
        "authorization".to_string(),
        "proxy-authorization".to_string(),
        "x-api-key".to_string(),
        "api-key".to_string(),
        "x-auth-token".to_string(),
        "cookie".to_string(),
    ]
}

pub fn default_interesting_headers() -> Vec<String> {
    vec![
        "content-type:".to_string(),
        "content-encoding:".to_string(),
        "transfer-encoding:".to_string(),
        "openai-".to_string(),
        "anthropic-".to_string(),
        "x-ratelimit-".to_string(),
        "x-request-id:".to_string(),
        "request-id:".to_string(),
    ]
}

pub fn default_max_decompressed_bytes() -> u64 {
    DEFAULT_MAX_DECOMPRESSED
}

pub fn default_flag_length_mismatch() -> bool {
    true
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            redact_prefix_len: default_redact_prefix_len(),
            sensitive_headers: default_sensitive_headers(),
            interesting_headers: default_interesting_headers(),
            max_decompressed_bytes: default_max_decompressed_bytes(),
            flag_length_mismatch: default_flag_length_mismatch(),
        }
    }
}

/// Transcript format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable transcript
    #[default]
    Text,
    /// The full report as JSON
    Json,
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub color: ColorMode,
    /// Characters of opaque data shown as a preview
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

pub fn default_preview_chars() -> usize {
    100
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: ColorMode::default(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Config {
    /// Check value ranges after loading.
    pub fn validate(&self) -> Result<(), String> {
        if self.decode.redact_prefix_len == 0 {
            return Err("decode.redact_prefix_len must be > 0".to_string());
        }
        if self.decode.max_decompressed_bytes == 0 {
            return Err("decode.max_decompressed_bytes must be > 0".to_string());
        }
        if self
            .decode
            .sensitive_headers
            .iter()
            .any(|h| h.trim().is_empty())
        {
            return Err("decode.sensitive_headers must not contain empty names".to_string());
        }
        if self
            .decode
            .interesting_headers
            .iter()
            .any(|h| h.trim().is_empty())
        {
            return Err("decode.interesting_headers must not contain empty prefixes".to_string());
        }
        if self.output.preview_chars == 0 {
            return Err("output.preview_chars must be > 0".to_string());
        }
        Ok(())
    }
}
