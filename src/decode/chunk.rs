//! Chunked transfer-encoding framing.
//!
//! Each capture event is one read or write, so at most one chunk boundary
//! is expected per event. The splitter does not loop.

/// Line separator used by HTTP/1.x framing.
pub const CRLF: &str = "\r\n";

/// Maximum number of hex digits accepted in a chunk-size line.
const MAX_SIZE_DIGITS: usize = 8;

/// One chunk split into its size line and the payload that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSplit<'a> {
    /// Text before the first CRLF (empty when there is no separator).
    pub size_line: &'a str,
    /// Everything after the first CRLF, or the whole body.
    pub remainder: &'a str,
}

impl<'a> ChunkSplit<'a> {
    /// Chunk size declared by the size line, if it is valid hex.
    ///
    /// Chunk extensions (`;name=value`) are ignored.
    pub fn declared_size(&self) -> Option<usize> {
        parse_chunk_size(self.size_line)
    }
}

/// Split `body` on its first CRLF.
pub fn split_chunk(body: &str) -> ChunkSplit<'_> {
    match body.split_once(CRLF) {
        Some((size_line, remainder)) => ChunkSplit {
            size_line,
            remainder,
        },
        None => ChunkSplit {
            size_line: "",
            remainder: body,
        },
    }
}

/// Parse a chunk-size line (`1a4`, `0`, `194;ext=1`).
pub fn parse_chunk_size(line: &str) -> Option<usize> {
    let digits = line.split(';').next().unwrap_or("").trim();
    if digits.is_empty()
        || digits.len() > MAX_SIZE_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    usize::from_str_radix(digits, 16).ok()
}
