//! Text and JSON renderings of a [`Report`].

use humansize::{format_size, BINARY};

use super::{DiagnosticRecord, Finding, Report, Summary};
use crate::capture::{READ_FUNCTION, WRITE_FUNCTION};
use crate::decode::frame::FrameKind;
use crate::theme::Theme;

/// Width of separators and rules.
pub const RULE_WIDTH: usize = 80;

fn separator() -> String {
    "=".repeat(RULE_WIDTH)
}

fn rule() -> String {
    "\u{2500}".repeat(RULE_WIDTH)
}

/// The whole report as pretty JSON.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// The human-readable transcript: preamble, one section per event, summary.
pub fn render_text(report: &Report, theme: &Theme) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Analyzing capture file: {}\n",
        report.source.display()
    ));
    out.push_str(&format!(
        "File size: {} ({} bytes)\n",
        format_size(report.file_size, BINARY),
        report.file_size
    ));
    for warning in &report.warnings {
        out.push_str(&theme.error_text(&format!("Warning: {}", warning.message)));
        out.push('\n');
    }
    out.push_str(&format!("Parsed {} events\n", report.records.len()));

    for record in &report.records {
        out.push_str(&render_record(record, theme));
    }
    out.push_str(&render_summary(&report.summary, theme));
    out
}

/// One event section.
pub fn render_record(record: &DiagnosticRecord, theme: &Theme) -> String {
    let mut out = String::new();
    let sep = theme.accent_text(&separator());
    out.push_str(&format!("\n{}\n", sep));
    out.push_str(&theme.heading_text(&format!("Event #{}: {}", record.index, record.function)));
    out.push_str(&format!("\n{}\n", sep));
    out.push_str(&format!(
        "PID: {}, Length: {} bytes",
        record.pid, record.declared_length
    ));
    if let Some(comm) = &record.comm {
        out.push_str(&format!(", Process: {}", comm));
    }
    out.push('\n');
    out.push_str(&format!("Type: {}\n", record.kind.label()));

    let mut in_headers = false;
    let mut decompressed = false;
    for finding in &record.findings {
        if let Finding::Header { .. } = finding {
            if !in_headers {
                out.push_str("\nKey Headers:\n");
                in_headers = true;
            }
        } else {
            in_headers = false;
        }
        if let Finding::Decompressed { .. } = finding {
            decompressed = true;
        }
        render_finding(&mut out, finding, record.kind, decompressed, theme);
    }
    out
}

fn render_finding(
    out: &mut String,
    finding: &Finding,
    kind: FrameKind,
    decompressed: bool,
    theme: &Theme,
) {
    match finding {
        Finding::RequestLine { line } => out.push_str(&format!("Request Line: {}\n", line)),
        Finding::StatusLine { line } => out.push_str(&format!("Status Line: {}\n", line)),
        Finding::Redacted { header, shown } => {
            out.push_str(&theme.error_text(&format!(
                "\u{26a0}\u{fe0f}  Contains {} header",
                header
            )));
            out.push_str(&format!("\n   {}\n", shown));
        }
        Finding::Header { line } => out.push_str(&format!("   {}\n", line)),
        Finding::Body { bytes } => {
            let label = match kind {
                FrameKind::HttpRequest => "Request Body",
                _ => "Response Body",
            };
            out.push_str(&format!("\n{}: {} bytes\n", label, bytes));
        }
        Finding::ChunkSize {
            size_line,
            declared,
        } => match declared {
            Some(size) => out.push_str(&format!(
                "   Chunk size: {} ({} bytes)\n",
                size_line, size
            )),
            None => out.push_str(&format!("   Chunk size: {}\n", size_line)),
        },
        Finding::GzipDetected { compressed_len } => out.push_str(&format!(
            "   Detected: Gzip-compressed data ({} bytes)\n",
            compressed_len
        )),
        Finding::Decompressed { len } => {
            out.push_str(&format!("   Decompressed Size: {} bytes\n", len))
        }
        Finding::Warning { message } => {
            out.push_str(&theme.error_text(&format!("\u{26a0}\u{fe0f}  {}", message)));
            out.push('\n');
        }
        Finding::StructuredContent { pretty } => {
            section(out, content_title(kind, decompressed), theme);
            out.push_str(&format!("{}\n", pretty));
        }
        Finding::EventStream { events } => {
            out.push_str(&format!("   Event stream: {} events\n", events))
        }
        Finding::RawContent { text } => {
            section(out, content_title(kind, decompressed), theme);
            out.push_str(&format!("{}\n", text));
        }
        Finding::AssistantMessage { text } => {
            section(out, "\u{1f916} AI ASSISTANT RESPONSE:", theme);
            out.push_str(&theme.success_text(text));
            out.push('\n');
        }
        Finding::Data { repr } => out.push_str(&format!("Data: {}\n", repr)),
        Finding::Preview {
            text,
            limit,
            truncated,
        } => {
            out.push_str(&format!(
                "First {} chars: {}\n",
                limit,
                theme.secondary_text(text)
            ));
            if *truncated {
                out.push_str("   ...\n");
            }
        }
        Finding::Truncated { bytes_lost } => {
            let detail = match bytes_lost {
                Some(lost) => format!("{} bytes lost", lost),
                None => "bytes lost unknown".to_string(),
            };
            out.push_str(&theme.error_text(&format!(
                "\u{26a0}\u{fe0f}  Capture truncated by agent ({})",
                detail
            )));
            out.push('\n');
        }
        Finding::LengthMismatch { declared, actual } => out.push_str(&format!(
            "Note: declared length {} differs from captured {} bytes\n",
            declared, actual
        )),
    }
}

fn content_title(kind: FrameKind, decompressed: bool) -> &'static str {
    match (kind, decompressed) {
        (FrameKind::HttpResponse | FrameKind::ChunkedBody, true) => "DECOMPRESSED RESPONSE:",
        (_, true) => "DECOMPRESSED CONTENT:",
        (FrameKind::HttpRequest, false) => "REQUEST BODY:",
        (FrameKind::HttpResponse, false) => "RESPONSE BODY:",
        _ => "CONTENT:",
    }
}

fn section(out: &mut String, title: &str, theme: &Theme) {
    let line = theme.secondary_text(&rule());
    out.push_str(&format!("\n{}\n", line));
    out.push_str(&format!("{}\n", theme.heading_text(title)));
    out.push_str(&format!("{}\n", line));
}

/// Trailing summary block.
pub fn render_summary(summary: &Summary, theme: &Theme) -> String {
    let mut out = String::new();
    let sep = theme.accent_text(&separator());
    out.push_str(&format!("\n{}\n", sep));
    out.push_str(&format!("{}\n", theme.heading_text("Analysis Complete")));
    out.push_str(&format!("{}\n", sep));
    out.push_str(&format!("Total events: {}\n", summary.total_events));
    out.push_str(&format!("{} events: {}\n", READ_FUNCTION, summary.read_events()));
    out.push_str(&format!("{} events: {}\n", WRITE_FUNCTION, summary.write_events()));
    for (tag, count) in summary.other_functions() {
        out.push_str(&format!("{} events: {}\n", tag, count));
    }
    if summary.malformed_lines > 0 {
        out.push_str(&format!("Malformed lines: {}\n", summary.malformed_lines));
    }
    if summary.decompression_failures > 0 {
        out.push_str(&theme.error_text(&format!(
            "Decompression failures: {}",
            summary.decompression_failures
        )));
        out.push('\n');
    }
    if let Some(line) = summary.scan_stopped_at {
        out.push_str(&theme.error_text(&format!("Scan stopped at line {}: read error", line)));
        out.push('\n');
    }
    out
}
