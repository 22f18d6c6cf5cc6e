//! Frame classification.
//!
//! Checks run in a fixed order and the first match wins. HTTP and chunk
//! checks look at the payload text; only the gzip check needs bytes, and it
//! reconstructs just the first two characters.

use serde::Serialize;

use super::bytes::reconstruct_bytes;
use super::chunk::CRLF;
use super::gzip;

/// Request-line prefixes that identify an HTTP request.
pub const HTTP_METHODS: [&str; 7] = [
    "GET ", "POST ", "PUT ", "DELETE ", "HEAD ", "OPTIONS ", "PATCH ",
];

/// Last chunk of a chunked body plus the empty trailer.
pub const CHUNK_END_MARKER: &str = "0\r\n\r\n";

/// Texts shorter than this (in characters) containing CRLF are chunk metadata.
pub const CHUNK_METADATA_MAX_CHARS: usize = 50;

/// What a captured payload is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    HttpRequest,
    HttpResponse,
    ChunkedBody,
    GzipStream,
    ChunkEndMarker,
    ChunkMetadata,
    Opaque,
}

impl FrameKind {
    /// Human-readable label used in transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            FrameKind::HttpRequest => "HTTP Request",
            FrameKind::HttpResponse => "HTTP Response",
            FrameKind::ChunkedBody => "Chunked Body",
            FrameKind::GzipStream => "Gzip Compressed Data",
            FrameKind::ChunkEndMarker => "Chunked Transfer End Marker",
            FrameKind::ChunkMetadata => "Chunked Transfer Metadata",
            FrameKind::Opaque => "Unknown/Binary Data",
        }
    }

    /// Whether the frame is an HTTP message with a start line.
    pub fn is_http(&self) -> bool {
        matches!(self, FrameKind::HttpRequest | FrameKind::HttpResponse)
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified payload.
///
/// For HTTP frames `header_lines` starts with the request or status line.
/// For chunked bodies it holds the chunk-size line. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub header_lines: Vec<String>,
    pub body: Option<Vec<u8>>,
}

impl Frame {
    /// A frame with no header lines and no body.
    pub fn bare(kind: FrameKind) -> Self {
        Self {
            kind,
            header_lines: Vec::new(),
            body: None,
        }
    }

    /// A frame whose body is the reconstruction of `text`.
    ///
    /// Empty text yields an absent body.
    pub fn with_body_text(kind: FrameKind, header_lines: Vec<String>, text: &str) -> Self {
        let body = if text.is_empty() {
            None
        } else {
            Some(reconstruct_bytes(text))
        };
        Self {
            kind,
            header_lines,
            body,
        }
    }

    /// Body length in bytes, zero when absent.
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }
}

/// Classify payload text.
pub fn classify(text: &str) -> FrameKind {
    if HTTP_METHODS.iter().any(|m| text.starts_with(m)) {
        return FrameKind::HttpRequest;
    }
    if text.starts_with("HTTP/") {
        return FrameKind::HttpResponse;
    }
    if text == CHUNK_END_MARKER {
        return FrameKind::ChunkEndMarker;
    }
    if text.contains(CRLF) && text.chars().count() < CHUNK_METADATA_MAX_CHARS {
        return FrameKind::ChunkMetadata;
    }
    if starts_with_gzip_magic(text) {
        return FrameKind::GzipStream;
    }
    FrameKind::Opaque
}

/// Gzip sniffing on reconstructed bytes, limited to the leading characters.
pub fn starts_with_gzip_magic(text: &str) -> bool {
    let head: String = text.chars().take(gzip::GZIP_MAGIC.len()).collect();
    gzip::detect(&reconstruct_bytes(&head))
}
