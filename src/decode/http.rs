//! HTTP message splitting and header handling.
//!
//! The header block is parsed with `httparse`, which also finds where the
//! body starts. Header lines are kept verbatim for display, and the parsed
//! headers decide which ones are shown (responses) or redacted (requests).
//! Filtering only affects diagnostics, the parsed message keeps every header.

use httparse::Status;
use serde::Serialize;
use tracing::debug;

use super::chunk::CRLF;
use crate::config::DecodeConfig;

/// Blank line between the header block and the body.
pub const HEADER_BODY_SEPARATOR: &str = "\r\n\r\n";

/// Appended to the visible prefix of a redacted header line.
pub const REDACTION_MARKER: &str = "... [REDACTED]";

/// Upper bound on headers parsed from one message.
pub const MAX_HEADERS: usize = 64;

/// A parsed header, case preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    /// `Name: value`, as the header is displayed.
    pub fn line(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

/// A request or response split into start line, headers and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMessage<'a> {
    pub start_line: &'a str,
    /// Header block after the start line, exactly as captured.
    pub head: &'a str,
    /// Headers `httparse` accepted. Empty when the header block is malformed.
    pub headers: Vec<Header>,
    /// `None` when there is no blank line or nothing follows it.
    pub body: Option<&'a str>,
}

impl<'a> HttpMessage<'a> {
    /// Start line followed by the raw header lines, owned.
    pub fn header_lines(&self) -> Vec<String> {
        std::iter::once(self.start_line)
            .chain(self.head.split(CRLF).filter(|l| !l.is_empty()))
            .map(str::to_string)
            .collect()
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Whether `Transfer-Encoding` lists `chunked`.
    pub fn is_chunked(&self) -> bool {
        self.header("transfer-encoding")
            .map(|v| {
                v.split(',')
                    .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
            })
            .unwrap_or(false)
    }
}

/// Split an HTTP message into start line, headers and body.
///
/// `Status::Complete` marks the body boundary. A partial header block has no
/// body; its headers are still read by parsing a terminated copy. When the
/// block is malformed the body starts after the first blank line and no
/// headers are reported.
pub fn split_message(text: &str) -> HttpMessage<'_> {
    let (start_line, rest) = match text.split_once(CRLF) {
        Some((start, rest)) => (start, rest),
        None => (text, ""),
    };

    let (head_end, headers) = match parse_head(text.as_bytes()) {
        Ok(Status::Complete((len, headers))) => (len, headers),
        Ok(Status::Partial) => {
            let terminated = format!("{}{}", text, HEADER_BODY_SEPARATOR);
            let headers = match parse_head(terminated.as_bytes()) {
                Ok(Status::Complete((_, headers))) => headers,
                _ => Vec::new(),
            };
            (text.len(), headers)
        }
        Err(err) => {
            debug!(error = %err, "malformed HTTP header block");
            let end = text
                .find(HEADER_BODY_SEPARATOR)
                .map_or(text.len(), |idx| idx + HEADER_BODY_SEPARATOR.len());
            (end, Vec::new())
        }
    };

    let head_start = text.len() - rest.len();
    let head = text
        .get(head_start.min(head_end)..head_end)
        .unwrap_or_default();
    let body = text.get(head_end..).filter(|b| !b.is_empty());
    HttpMessage {
        start_line,
        head,
        headers,
        body,
    }
}

/// Parse the header block of a request or a response.
///
/// Completes with the byte length of the header block, blank line included.
fn parse_head(bytes: &[u8]) -> Result<Status<(usize, Vec<Header>)>, httparse::Error> {
    let mut storage = [httparse::EMPTY_HEADER; MAX_HEADERS];
    if bytes.starts_with(b"HTTP/") {
        let mut res = httparse::Response::new(&mut storage);
        Ok(match res.parse(bytes)? {
            Status::Complete(len) => Status::Complete((len, owned_headers(res.headers))),
            Status::Partial => Status::Partial,
        })
    } else {
        let mut req = httparse::Request::new(&mut storage);
        Ok(match req.parse(bytes)? {
            Status::Complete(len) => Status::Complete((len, owned_headers(req.headers))),
            Status::Partial => Status::Partial,
        })
    }
}

fn owned_headers(headers: &[httparse::Header<'_>]) -> Vec<Header> {
    headers
        .iter()
        .map(|h| Header {
            name: h.name.to_string(),
            value: String::from_utf8_lossy(h.value).into_owned(),
        })
        .collect()
}

/// A header line whose value was hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redaction {
    /// Header name as it appeared on the wire.
    pub header: String,
    /// Visible prefix plus [`REDACTION_MARKER`].
    pub shown: String,
}

/// Which headers are redacted and which are worth displaying.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    sensitive: Vec<String>,
    interesting: Vec<String>,
    redact_prefix_len: usize,
}

impl HeaderPolicy {
    pub fn new(sensitive: Vec<String>, interesting: Vec<String>, redact_prefix_len: usize) -> Self {
        Self {
            sensitive: sensitive.iter().map(|s| s.to_ascii_lowercase()).collect(),
            interesting: interesting.iter().map(|s| s.to_ascii_lowercase()).collect(),
            redact_prefix_len,
        }
    }

    pub fn from_config(config: &DecodeConfig) -> Self {
        Self::new(
            config.sensitive_headers.clone(),
            config.interesting_headers.clone(),
            config.redact_prefix_len,
        )
    }

    /// Whether a header with this name carries a credential.
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.sensitive.iter().any(|s| name.eq_ignore_ascii_case(s))
    }

    /// Redacted forms of every sensitive header, in order.
    pub fn redactions(&self, headers: &[Header]) -> Vec<Redaction> {
        headers
            .iter()
            .filter(|h| self.is_sensitive(&h.name))
            .map(|h| Redaction {
                header: h.name.clone(),
                shown: redact_header(&h.line(), self.redact_prefix_len),
            })
            .collect()
    }

    /// Lines of the headers matching one of the interesting prefixes.
    pub fn interesting(&self, headers: &[Header]) -> Vec<String> {
        headers
            .iter()
            .map(Header::line)
            .filter(|line| {
                let lower = line.to_ascii_lowercase();
                self.interesting.iter().any(|p| lower.starts_with(p.as_str()))
            })
            .collect()
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::from_config(&DecodeConfig::default())
    }
}

/// Keep a prefix of a header line and append the marker.
///
/// `prefix_len` is an upper bound, not a fixed length: the prefix never
/// extends past half of the value, so a short credential is cut earlier than
/// `prefix_len` and the visible length varies with the value.
pub fn redact_header(line: &str, prefix_len: usize) -> String {
    let total = line.chars().count();
    let name_len = match line.find(':') {
        Some(idx) => {
            let after = &line[idx + 1..];
            let ws = after.len() - after.trim_start().len();
            line[..idx + 1 + ws].chars().count()
        }
        None => 0,
    };
    let value_len = total - name_len;
    let visible = prefix_len.min(name_len + value_len / 2);
    let prefix: String = line.chars().take(visible).collect();
    format!("{}{}", prefix, REDACTION_MARKER)
}
