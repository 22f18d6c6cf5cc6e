//! Byte reconstruction through the full JSON layer

use capdec::decode::bytes::{encode_text, reconstruct_bytes};
use capdec::CaptureEvent;

use crate::helpers::{capture_line, gzip};

fn through_log(payload: &[u8]) -> Vec<u8> {
    let line = capture_line("READ/RECV", 1, payload);
    let event = CaptureEvent::from_json(1, &line).unwrap();
    reconstruct_bytes(&event.raw_text)
}

#[test]
fn every_byte_survives_json_escaping() {
    let payload: Vec<u8> = (0..=255u8).collect();
    assert_eq!(through_log(&payload), payload);
}

#[test]
fn utf8_text_survives_json_escaping() {
    let payload = "héllo → wörld 🚀 日本語".as_bytes();
    assert_eq!(through_log(payload), payload);
}

#[test]
fn gzip_stream_survives_json_escaping() {
    let payload = gzip(br#"{"choices":[{"message":{"content":"hello"}}]}"#);
    assert_eq!(through_log(&payload), payload);
}

#[test]
fn agent_style_escapes_decode_to_latin1_bytes() {
    let line = r#"{"data":"\u001f\u008b\b\u0000\u0000\u0000\u0000\u0000\u0000\u0003"}"#;
    let event = CaptureEvent::from_json(1, line).unwrap();
    assert_eq!(
        reconstruct_bytes(&event.raw_text),
        vec![0x1f, 0x8b, 0x08, 0, 0, 0, 0, 0, 0, 0x03]
    );
}

#[test]
fn wide_characters_stay_literal_in_encoded_text() {
    let encoded = encode_text("→".as_bytes());
    assert_eq!(encoded, "→");
    assert_eq!(reconstruct_bytes(&encoded), "→".as_bytes());
}
