//! Gzip stream detection and inflation.
//!
//! Detection only looks at the two magic bytes. Inflation is all-or-nothing:
//! a stream that ends early (a single captured read rarely holds the whole
//! body) is reported as an error, never as partial text.

use std::io::{self, Read};

use flate2::bufread::GzDecoder;

/// Gzip member signature.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Default cap on inflated output (16 MiB).
pub const DEFAULT_MAX_DECOMPRESSED: u64 = 16 * 1024 * 1024;

/// Why a gzip stream could not be inflated.
#[derive(Debug, thiserror::Error)]
pub enum DecompressError {
    #[error("data does not start with the gzip signature")]
    MissingSignature,

    #[error("stream ended before the gzip trailer (truncated capture?)")]
    Truncated,

    #[error("corrupt gzip stream: {0}")]
    Corrupt(String),

    #[error("decompressed size exceeds limit of {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Returns true iff `bytes` starts with the gzip signature.
pub fn detect(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Inflate a gzip stream and decode the result as lossy UTF-8.
pub fn inflate(bytes: &[u8]) -> Result<String, DecompressError> {
    inflate_with_limit(bytes, DEFAULT_MAX_DECOMPRESSED)
}

/// Like [`inflate`], with an explicit cap on the decompressed size.
pub fn inflate_with_limit(bytes: &[u8], limit: u64) -> Result<String, DecompressError> {
    if !detect(bytes) {
        return Err(DecompressError::MissingSignature);
    }

    let decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .take(limit.saturating_add(1))
        .read_to_end(&mut decompressed)
        .map_err(classify_io_error)?;

    if decompressed.len() as u64 > limit {
        return Err(DecompressError::TooLarge { limit });
    }

    Ok(String::from_utf8_lossy(&decompressed).into_owned())
}

fn classify_io_error(err: io::Error) -> DecompressError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => DecompressError::Truncated,
        _ => DecompressError::Corrupt(err.to_string()),
    }
}
