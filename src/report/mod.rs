//! Diagnostic records and the aggregate report.
//!
//! [`Reporter`] turns each [`DecodedEvent`] into a [`DiagnosticRecord`]: an
//! ordered list of [`Finding`]s. Records are appended in file order and never
//! edited afterwards. Rendering lives in [`render`].

pub mod render;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::capture::{CaptureEvent, READ_FUNCTION, WRITE_FUNCTION};
use crate::content::Content;
use crate::decode::frame::FrameKind;
use crate::decode::{DecodedEvent, DecodedPayload, LengthCheck};
use crate::error::DecodeError;

/// One line of diagnostic output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    RequestLine { line: String },
    StatusLine { line: String },
    /// A sensitive header, shown only as a prefix.
    Redacted { header: String, shown: String },
    /// A response header on the display list.
    Header { line: String },
    /// Size of an HTTP body in bytes.
    Body { bytes: usize },
    ChunkSize { size_line: String, declared: Option<usize> },
    GzipDetected { compressed_len: usize },
    Decompressed { len: usize },
    Warning { message: String },
    StructuredContent { pretty: String },
    EventStream { events: usize },
    RawContent { text: String },
    AssistantMessage { text: String },
    /// Escaped form of a short metadata frame.
    Data { repr: String },
    Preview {
        text: String,
        limit: usize,
        truncated: bool,
    },
    Truncated { bytes_lost: Option<i64> },
    LengthMismatch { declared: i64, actual: usize },
}

/// Findings for one capture event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    /// 1-based position among parsed events.
    pub index: usize,
    /// Line in the capture log.
    pub line: usize,
    pub function: String,
    pub pid: i64,
    pub declared_length: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm: Option<String>,
    pub kind: FrameKind,
    pub findings: Vec<Finding>,
}

impl DiagnosticRecord {
    /// Whether any finding is a warning.
    pub fn has_warning(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f, Finding::Warning { .. }))
    }

    /// Extracted assistant text, if any.
    pub fn assistant_message(&self) -> Option<&str> {
        self.findings.iter().find_map(|f| match f {
            Finding::AssistantMessage { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A log line the reader could not turn into an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl From<&DecodeError> for ReadWarning {
    fn from(err: &DecodeError) -> Self {
        Self {
            line: err.line(),
            message: err.to_string(),
        }
    }
}

/// Aggregate counts over a whole capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_events: usize,
    /// Event count per function tag.
    pub by_function: BTreeMap<String, usize>,
    pub malformed_lines: usize,
    pub decompression_failures: usize,
    /// Line at which a read error ended the scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_stopped_at: Option<usize>,
}

impl Summary {
    pub fn count(&self, function: &str) -> usize {
        self.by_function.get(function).copied().unwrap_or(0)
    }

    pub fn read_events(&self) -> usize {
        self.count(READ_FUNCTION)
    }

    pub fn write_events(&self) -> usize {
        self.count(WRITE_FUNCTION)
    }

    /// Tags other than read and write, in sorted order.
    pub fn other_functions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_function
            .iter()
            .filter(|(tag, _)| tag.as_str() != READ_FUNCTION && tag.as_str() != WRITE_FUNCTION)
            .map(|(tag, count)| (tag.as_str(), *count))
    }
}

/// Everything produced by one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source: PathBuf,
    pub file_size: u64,
    pub warnings: Vec<ReadWarning>,
    pub records: Vec<DiagnosticRecord>,
    pub summary: Summary,
}

/// Accumulates diagnostic records in event order.
#[derive(Debug)]
pub struct Reporter {
    preview_chars: usize,
    warnings: Vec<ReadWarning>,
    records: Vec<DiagnosticRecord>,
    summary: Summary,
}

impl Reporter {
    pub fn new(preview_chars: usize) -> Self {
        Self {
            preview_chars,
            warnings: Vec::new(),
            records: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Record a reader error.
    ///
    /// Recoverable errors are skipped lines. Anything else ended the scan and
    /// is reported as such, not counted as malformed.
    pub fn record_warning(&mut self, err: &DecodeError) {
        let mut warning = ReadWarning::from(err);
        if err.is_recoverable() {
            self.summary.malformed_lines += 1;
        } else {
            self.summary.scan_stopped_at = err.line();
            warning.message = format!("Scan stopped: {}", warning.message);
        }
        self.warnings.push(warning);
    }

    /// Append the record for one decoded event.
    pub fn record_event(&mut self, event: &CaptureEvent, decoded: &DecodedEvent) -> &DiagnosticRecord {
        let findings = self.findings(event, decoded);
        if decoded
            .payload
            .as_ref()
            .map_or(false, |p| p.failure.is_some())
        {
            self.summary.decompression_failures += 1;
        }
        self.summary.total_events += 1;
        *self
            .summary
            .by_function
            .entry(event.function.clone())
            .or_insert(0) += 1;

        let index = self.records.len() + 1;
        self.records.push(DiagnosticRecord {
            index,
            line: event.line,
            function: event.function.clone(),
            pid: event.process_id,
            declared_length: event.declared_length,
            comm: event.meta.comm.clone(),
            kind: decoded.kind(),
            findings,
        });
        &self.records[index - 1]
    }

    pub fn finish(self, source: PathBuf, file_size: u64) -> Report {
        Report {
            source,
            file_size,
            warnings: self.warnings,
            records: self.records,
            summary: self.summary,
        }
    }

    fn findings(&self, event: &CaptureEvent, decoded: &DecodedEvent) -> Vec<Finding> {
        let mut findings = Vec::new();
        let frame = &decoded.frame;

        match frame.kind {
            FrameKind::HttpRequest => {
                if let Some(line) = &decoded.start_line {
                    findings.push(Finding::RequestLine { line: line.clone() });
                }
                findings.extend(decoded.redactions.iter().map(|r| Finding::Redacted {
                    header: r.header.clone(),
                    shown: r.shown.clone(),
                }));
            }
            FrameKind::HttpResponse => {
                if let Some(line) = &decoded.start_line {
                    findings.push(Finding::StatusLine { line: line.clone() });
                }
                findings.extend(
                    decoded
                        .shown_headers
                        .iter()
                        .map(|line| Finding::Header { line: line.clone() }),
                );
            }
            FrameKind::ChunkMetadata => findings.push(Finding::Data {
                repr: format!("{:?}", event.raw_text),
            }),
            FrameKind::Opaque => findings.push(self.preview(&event.raw_text)),
            FrameKind::ChunkEndMarker | FrameKind::ChunkedBody | FrameKind::GzipStream => {}
        }

        if frame.kind.is_http() && frame.body.is_some() {
            findings.push(Finding::Body {
                bytes: frame.body_len(),
            });
        }
        if let Some(payload) = &decoded.payload {
            payload_findings(payload, &mut findings);
        }

        match decoded.length_check {
            Some(LengthCheck::Truncated { bytes_lost }) => {
                findings.push(Finding::Truncated { bytes_lost })
            }
            Some(LengthCheck::Mismatch { declared, actual }) => {
                findings.push(Finding::LengthMismatch { declared, actual })
            }
            None => {}
        }
        findings
    }

    fn preview(&self, text: &str) -> Finding {
        let total = text.chars().count();
        Finding::Preview {
            text: text.chars().take(self.preview_chars).collect(),
            limit: self.preview_chars,
            truncated: total > self.preview_chars,
        }
    }
}

fn payload_findings(payload: &DecodedPayload, findings: &mut Vec<Finding>) {
    let source = &payload.source_frame;
    if source.kind == FrameKind::ChunkedBody {
        if let Some(size_line) = source.header_lines.first() {
            findings.push(Finding::ChunkSize {
                size_line: size_line.clone(),
                declared: crate::decode::chunk::parse_chunk_size(size_line),
            });
        }
    }
    if payload.compressed {
        findings.push(Finding::GzipDetected {
            compressed_len: source.body_len(),
        });
    }
    if let Some(text) = &payload.decompressed_text {
        findings.push(Finding::Decompressed { len: text.len() });
    }
    if let Some(err) = &payload.failure {
        findings.push(Finding::Warning {
            message: err.to_string(),
        });
    }

    match &payload.content {
        Some(Content::Json { pretty, .. }) => findings.push(Finding::StructuredContent {
            pretty: pretty.clone(),
        }),
        Some(Content::EventStream { events, .. }) => {
            findings.push(Finding::EventStream { events: *events })
        }
        Some(Content::Text(text)) => findings.push(Finding::RawContent { text: text.clone() }),
        None => {}
    }
    if let Some(text) = payload.extracted_message() {
        findings.push(Finding::AssistantMessage {
            text: text.to_string(),
        });
    }
}
