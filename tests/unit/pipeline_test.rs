//! End-to-end decode of single events

use capdec::content::Content;
use capdec::decode::frame::FrameKind;
use capdec::decode::LengthCheck;
use capdec::{CaptureEvent, DecodeError, Decoder};

use crate::helpers::{capture_line, gzip};

const CHAT: &[u8] = br#"{"choices":[{"message":{"content":"hello"}}]}"#;

fn decode(function: &str, payload: &[u8]) -> capdec::DecodedEvent {
    let event = CaptureEvent::from_json(1, &capture_line(function, 7, payload)).unwrap();
    Decoder::default().decode(&event)
}

#[test]
fn chat_completion_in_chunked_gzip_response() {
    let body = gzip(CHAT);
    let mut payload = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Encoding: gzip\r\nTransfer-Encoding: chunked\r\nx-ratelimit-remaining-requests: 99\r\nServer: cloudflare\r\n\r\n{:x}\r\n",
        body.len()
    )
    .into_bytes();
    payload.extend_from_slice(&body);

    let decoded = decode("READ/RECV", &payload);
    assert_eq!(decoded.kind(), FrameKind::HttpResponse);
    assert_eq!(
        decoded.shown_headers,
        vec![
            "Content-Type: application/json",
            "Content-Encoding: gzip",
            "Transfer-Encoding: chunked",
            "x-ratelimit-remaining-requests: 99",
        ]
    );
    let payload = decoded.payload.unwrap();
    assert_eq!(payload.source_frame.header_lines, vec![format!("{:x}", body.len())]);
    assert_eq!(payload.source_frame.body.as_deref(), Some(body.as_slice()));
    assert_eq!(payload.extracted_message(), Some("hello"));
    assert_eq!(decoded.length_check, None);
}

#[test]
fn complete_plain_chunked_response_yields_message() {
    let mut payload = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n",
        CHAT.len()
    )
    .into_bytes();
    payload.extend_from_slice(CHAT);
    payload.extend_from_slice(b"\r\n0\r\n\r\n");

    let decoded = decode("READ/RECV", &payload);
    let payload = decoded.payload.unwrap();
    assert_eq!(payload.source_frame.body.as_deref(), Some(CHAT));
    assert!(payload.structured_content().is_some());
    assert_eq!(payload.extracted_message(), Some("hello"));
}

#[test]
fn hex_looking_body_is_not_unwrapped_without_chunked_encoding() {
    let decoded = decode(
        "READ/RECV",
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 15\r\n\r\nadd\r\nhello world",
    );
    let payload = decoded.payload.unwrap();
    assert_eq!(payload.source_frame.kind, FrameKind::HttpResponse);
    assert_eq!(
        payload.content,
        Some(Content::Text("add\r\nhello world".to_string()))
    );
}

#[test]
fn standalone_chunk_with_gzip_remainder() {
    let body = gzip(CHAT);
    let mut payload = b"194\r\n".to_vec();
    payload.extend_from_slice(&body);

    let decoded = decode("READ/RECV", &payload);
    assert_eq!(decoded.kind(), FrameKind::ChunkedBody);
    assert_eq!(decoded.frame.header_lines, vec!["194"]);
    let payload = decoded.payload.unwrap();
    assert!(payload.compressed);
    assert_eq!(payload.decompressed_text.as_deref(), std::str::from_utf8(CHAT).ok());
}

#[test]
fn request_credentials_are_redacted() {
    let decoded = decode(
        "WRITE/SEND",
        b"POST /v1/messages HTTP/1.1\r\nx-api-key: sk-ant-0123456789abcdef\r\nAuthorization: Bearer sk-abcdef0123456789\r\n\r\n{}",
    );
    assert_eq!(decoded.redactions.len(), 2);
    for redaction in &decoded.redactions {
        assert!(redaction.shown.ends_with("... [REDACTED]"));
        assert!(!redaction.shown.contains("0123456789"));
    }
    assert_eq!(decoded.redactions[0].header, "x-api-key");
}

#[test]
fn gzip_signature_inside_response_does_not_change_kind() {
    let mut payload = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
    payload.extend_from_slice(&gzip(CHAT));
    let decoded = decode("READ/RECV", &payload);
    assert_eq!(decoded.kind(), FrameKind::HttpResponse);
    assert!(decoded.payload.unwrap().compressed);
}

#[test]
fn truncated_gzip_is_a_recorded_failure() {
    let full = gzip(&(0..2000).map(|i| (i % 251) as u8).collect::<Vec<_>>());
    let decoded = decode("READ/RECV", &full[..full.len() - 12]);
    assert_eq!(decoded.kind(), FrameKind::GzipStream);
    let payload = decoded.payload.unwrap();
    assert!(payload.content.is_none());
    assert!(matches!(
        payload.failure,
        Some(DecodeError::DecompressionFailure(_))
    ));
}

#[test]
fn event_stream_body_is_folded() {
    let decoded = decode(
        "READ/RECV",
        b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\r\nevent: content_block_delta\ndata: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi\"}}\n\n",
    );
    let payload = decoded.payload.unwrap();
    assert!(matches!(payload.content, Some(Content::EventStream { .. })));
    assert_eq!(payload.extracted_message(), Some("Hi"));
}

#[test]
fn non_json_body_falls_back_to_text() {
    let decoded = decode("READ/RECV", b"HTTP/1.1 404 Not Found\r\n\r\nnot found");
    let payload = decoded.payload.unwrap();
    assert_eq!(payload.content, Some(Content::Text("not found".to_string())));
    assert_eq!(payload.structured_content(), None);
}

#[test]
fn declared_length_mismatch_is_reported() {
    let line = r#"{"function":"READ/RECV","pid":1,"len":10,"data":"abc"}"#;
    let event = CaptureEvent::from_json(1, line).unwrap();
    let decoded = Decoder::default().decode(&event);
    assert_eq!(
        decoded.length_check,
        Some(LengthCheck::Mismatch {
            declared: 10,
            actual: 3
        })
    );
}
