//! The capture decode pipeline.
//!
//! ```text
//! CaptureEvent -> classify -> split HTTP message -> unwrap chunk
//!              -> reconstruct bytes -> inflate gzip -> interpret content
//! ```
//!
//! [`Decoder::decode`] is a pure function of one event. Failures inside a
//! stage are stored on the result and never cross the event boundary.

pub mod bytes;
pub mod chunk;
pub mod frame;
pub mod gzip;
pub mod http;

use serde_json::Value;
use tracing::{debug, warn};

use crate::capture::CaptureEvent;
use crate::config::DecodeConfig;
use crate::content::{self, Content};
use crate::error::DecodeError;
use self::bytes::{reconstructed_len, take_reconstructed};
use self::chunk::split_chunk;
use self::frame::{classify, Frame, FrameKind};
use self::http::{split_message, HeaderPolicy, Redaction};

/// Result of decoding a body-carrying frame.
#[derive(Debug)]
pub struct DecodedPayload {
    /// Frame whose body was decoded: the HTTP message, its chunk, or a
    /// stand-alone gzip/chunk frame.
    pub source_frame: Frame,
    /// Whether the body carried the gzip signature.
    pub compressed: bool,
    pub decompressed_text: Option<String>,
    /// `None` when decompression failed.
    pub content: Option<Content>,
    /// Set when decoding stopped early.
    pub failure: Option<DecodeError>,
}

impl DecodedPayload {
    pub fn structured_content(&self) -> Option<&Value> {
        self.content.as_ref().and_then(Content::structured)
    }

    pub fn extracted_message(&self) -> Option<&str> {
        self.content.as_ref().and_then(Content::message)
    }
}

/// Relationship between the declared and the captured payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCheck {
    /// The agent kept fewer bytes than the operation transferred.
    Truncated { bytes_lost: Option<i64> },
    /// Declared and reconstructed lengths differ without a truncation flag.
    Mismatch { declared: i64, actual: usize },
}

/// Everything learned about one event.
#[derive(Debug)]
pub struct DecodedEvent {
    /// Top-level classification of the event.
    pub frame: Frame,
    /// Request or status line for HTTP frames.
    pub start_line: Option<String>,
    /// Sensitive request headers, redacted.
    pub redactions: Vec<Redaction>,
    /// Response headers selected for display.
    pub shown_headers: Vec<String>,
    pub payload: Option<DecodedPayload>,
    pub length_check: Option<LengthCheck>,
}

impl DecodedEvent {
    fn new(frame: Frame) -> Self {
        Self {
            frame,
            start_line: None,
            redactions: Vec::new(),
            shown_headers: Vec::new(),
            payload: None,
            length_check: None,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.frame.kind
    }
}

/// Stateless event decoder.
#[derive(Debug, Clone)]
pub struct Decoder {
    policy: HeaderPolicy,
    max_decompressed: u64,
    flag_length_mismatch: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(&DecodeConfig::default())
    }
}

impl Decoder {
    pub fn new(config: &DecodeConfig) -> Self {
        Self {
            policy: HeaderPolicy::from_config(config),
            max_decompressed: config.max_decompressed_bytes,
            flag_length_mismatch: config.flag_length_mismatch,
        }
    }

    /// Decode one event.
    pub fn decode(&self, event: &CaptureEvent) -> DecodedEvent {
        let text = event.raw_text.as_str();
        let kind = classify(text);
        debug!(line = event.line, ?kind, "classified event");

        let mut decoded = match kind {
            FrameKind::HttpRequest | FrameKind::HttpResponse => self.decode_http(kind, text),
            FrameKind::GzipStream => {
                let frame = Frame::with_body_text(kind, Vec::new(), text);
                let mut decoded = DecodedEvent::new(frame.clone());
                decoded.payload = Some(self.decode_payload(frame, text));
                decoded
            }
            FrameKind::ChunkMetadata => DecodedEvent::new(Frame {
                kind,
                header_lines: vec![text.to_string()],
                body: None,
            }),
            FrameKind::ChunkEndMarker => DecodedEvent::new(Frame::bare(kind)),
            FrameKind::Opaque | FrameKind::ChunkedBody => self.decode_opaque(text),
        };

        decoded.length_check = self.check_length(event);
        decoded
    }

    fn decode_http(&self, kind: FrameKind, text: &str) -> DecodedEvent {
        let message = split_message(text);
        let frame = Frame::with_body_text(kind, message.header_lines(), message.body.unwrap_or(""));
        let mut decoded = DecodedEvent::new(frame);
        decoded.start_line = Some(message.start_line.to_string());

        if kind == FrameKind::HttpRequest {
            decoded.redactions = self.policy.redactions(&message.headers);
        } else {
            decoded.shown_headers = self.policy.interesting(&message.headers);
        }

        if let Some(body) = message.body {
            let chunk = if message.is_chunked() {
                unwrap_chunk(body)
            } else {
                None
            };
            decoded.payload = Some(match chunk {
                Some((chunk_frame, remainder)) => self.decode_payload(chunk_frame, remainder),
                None => self.decode_payload(decoded.frame.clone(), body),
            });
        }
        decoded
    }

    fn decode_opaque(&self, text: &str) -> DecodedEvent {
        match unwrap_chunk(text) {
            Some((chunk_frame, remainder)) => {
                let mut decoded = DecodedEvent::new(chunk_frame.clone());
                decoded.payload = Some(self.decode_payload(chunk_frame, remainder));
                decoded
            }
            None => DecodedEvent::new(Frame::with_body_text(FrameKind::Opaque, Vec::new(), text)),
        }
    }

    /// Inflate when the body is gzip, then interpret the resulting text.
    fn decode_payload(&self, source_frame: Frame, text: &str) -> DecodedPayload {
        let compressed = source_frame.body.as_deref().map_or(false, gzip::detect);
        let mut payload = DecodedPayload {
            source_frame,
            compressed,
            decompressed_text: None,
            content: None,
            failure: None,
        };

        if !compressed {
            payload.content = Some(content::interpret(text));
            return payload;
        }

        let body = payload.source_frame.body.as_deref().unwrap_or_default();
        match gzip::inflate_with_limit(body, self.max_decompressed) {
            Ok(inflated) => {
                payload.content = Some(content::interpret(&inflated));
                payload.decompressed_text = Some(inflated);
            }
            Err(err) => {
                warn!(compressed_len = body.len(), error = %err, "gzip inflation failed");
                payload.failure = Some(DecodeError::DecompressionFailure(err));
            }
        }
        payload
    }

    fn check_length(&self, event: &CaptureEvent) -> Option<LengthCheck> {
        if event.is_truncated() {
            return Some(LengthCheck::Truncated {
                bytes_lost: event.meta.bytes_lost,
            });
        }
        if !self.flag_length_mismatch || event.declared_length <= 0 {
            return None;
        }
        let actual = reconstructed_len(&event.raw_text);
        (actual as i64 != event.declared_length).then_some(LengthCheck::Mismatch {
            declared: event.declared_length,
            actual,
        })
    }
}

/// Split off a leading chunk-size line when it is valid hex and chunk data
/// follows it.
///
/// The data is cut at the declared size. A remainder shorter than that is a
/// partial read and is kept whole.
fn unwrap_chunk(text: &str) -> Option<(Frame, &str)> {
    let split = split_chunk(text);
    let size = split.declared_size()?;
    let data = take_reconstructed(split.remainder, size).unwrap_or(split.remainder);
    if data.is_empty() {
        return None;
    }
    let frame = Frame::with_body_text(
        FrameKind::ChunkedBody,
        vec![split.size_line.to_string()],
        data,
    );
    Some((frame, data))
}
