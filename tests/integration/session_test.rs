//! Whole-file decode sessions over the fixture log

use capdec::decode::frame::FrameKind;
use capdec::report::render::{render_summary, render_text};
use capdec::report::Finding;
use capdec::{Config, Session, Theme};

use crate::helpers::fixture_path;

fn fixture_report(parallel: bool) -> capdec::Report {
    Session::new(&Config::default())
        .parallel(parallel)
        .run_file(&fixture_path("openai_capture.jsonl"))
        .unwrap()
}

#[test]
fn fixture_records_in_file_order() {
    let report = fixture_report(false);
    let kinds: Vec<FrameKind> = report.records.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FrameKind::HttpRequest,
            FrameKind::HttpResponse,
            FrameKind::ChunkEndMarker,
            FrameKind::GzipStream,
            FrameKind::HttpResponse,
            FrameKind::Opaque,
        ]
    );
    let lines: Vec<usize> = report.records.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 6, 7, 8]);
}

#[test]
fn response_yields_assistant_message() {
    let report = fixture_report(false);
    assert_eq!(
        report.records[1].assistant_message(),
        Some("Hello! How can I help you today?")
    );
    assert_eq!(report.records[4].assistant_message(), Some("Hello"));
}

#[test]
fn truncated_capture_is_explained() {
    let report = fixture_report(false);
    let record = &report.records[3];
    assert!(record.has_warning());
    assert!(record
        .findings
        .iter()
        .any(|f| matches!(f, Finding::Truncated { bytes_lost: Some(483) })));
}

#[test]
fn parallel_session_matches_sequential() {
    assert_eq!(fixture_report(true), fixture_report(false));
}

#[test]
fn fixture_summary_snapshot() {
    let report = fixture_report(false);
    insta::assert_snapshot!(render_summary(&report.summary, &Theme::plain()).trim_start(), @r###"
    ================================================================================
    Analysis Complete
    ================================================================================
    Total events: 6
    READ/RECV events: 4
    WRITE/SEND events: 1
    HANDSHAKE events: 1
    Malformed lines: 1
    Decompression failures: 1
    "###);
}

#[test]
fn transcript_never_shows_full_secret() {
    let report = fixture_report(false);
    let text = render_text(&report, &Theme::plain());
    assert!(text.contains("... [REDACTED]"));
    assert!(!text.contains("abcdef0123456789SECRET"));
}
