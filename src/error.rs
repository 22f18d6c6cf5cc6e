//! Error taxonomy for the decode pipeline.
//!
//! - `MalformedRecord` - a log line could not be turned into an event
//! - `Io` - reading the log failed; the scan ends at that line
//! - `DecompressionFailure` - a detected gzip stream could not be inflated
//! - `ContentParseMismatch` - text is not the structured format we looked for
//!
//! Only `Io` ends a scan. The reporter turns the rest into findings.

use crate::decode::gzip::DecompressError;

/// Errors produced by individual decode stages.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A log line is not a well-formed capture record.
    #[error("Failed to parse line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Reading a line from the log failed at the I/O level.
    #[error("Failed to read line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A detected compressed stream could not be inflated.
    #[error("Failed to decompress gzip data: {0}")]
    DecompressionFailure(#[from] DecompressError),

    /// Text is not parseable as structured (JSON) content.
    #[error("Content is not structured data: {reason}")]
    ContentParseMismatch { reason: String },
}

impl DecodeError {
    /// Line number the error refers to, if it came from the reader.
    pub fn line(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedRecord { line, .. } | DecodeError::Io { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Whether the reader can keep going after this error.
    ///
    /// Malformed lines are skipped; an I/O failure ends the scan because the
    /// underlying stream is no longer trustworthy.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DecodeError::Io { .. })
    }
}
