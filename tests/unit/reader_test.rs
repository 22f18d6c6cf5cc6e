//! Capture log reader tests

use std::io::{BufReader, Cursor, Write};

use capdec::{DecodeError, EventReader};

use crate::helpers::{capture_line, write_log};

#[test]
fn malformed_line_is_isolated() {
    for bad in 1..=5 {
        let lines: Vec<String> = (1..=5)
            .map(|i| {
                if i == bad {
                    "{\"function\": broken".to_string()
                } else {
                    capture_line("READ/RECV", i, format!("payload {}", i).as_bytes())
                }
            })
            .collect();
        let file = write_log(&lines);

        let items: Vec<_> = EventReader::open(file.path()).unwrap().collect();
        let events: Vec<_> = items.iter().filter_map(|i| i.as_ref().ok()).collect();
        let errors: Vec<_> = items.iter().filter_map(|i| i.as_ref().err()).collect();

        assert_eq!(events.len(), 4);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line(), Some(bad as usize));
        let lines_seen: Vec<usize> = events.iter().map(|e| e.line).collect();
        let expected: Vec<usize> = (1..=5).filter(|&i| i != bad as usize).collect();
        assert_eq!(lines_seen, expected);
    }
}

#[test]
fn blank_lines_are_skipped_silently() {
    let log = format!(
        "\n   \n{}\n\n{}\n",
        capture_line("WRITE/SEND", 1, b"a"),
        capture_line("READ/RECV", 1, b"b")
    );
    let items: Vec<_> = EventReader::new(Cursor::new(log)).collect();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.is_ok()));
    assert_eq!(items[1].as_ref().unwrap().line, 5);
}

#[test]
fn invalid_utf8_line_is_malformed() {
    let mut bytes = capture_line("READ/RECV", 1, b"ok").into_bytes();
    bytes.extend_from_slice(b"\n{\"data\":\"\xff\xfe\"}\n");
    bytes.extend_from_slice(capture_line("READ/RECV", 1, b"after").as_bytes());

    let items: Vec<_> = EventReader::new(Cursor::new(bytes)).collect();
    assert_eq!(items.len(), 3);
    assert!(matches!(
        items[1],
        Err(DecodeError::MalformedRecord { line: 2, .. })
    ));
    assert_eq!(items[2].as_ref().unwrap().raw_text, "after");
}

#[test]
fn last_line_without_newline_is_read() {
    let log = capture_line("READ/RECV", 9, b"tail");
    let items: Vec<_> = EventReader::new(Cursor::new(log)).collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].as_ref().unwrap().process_id, 9);
}

#[test]
fn rewind_restarts_from_first_line() {
    let mut file = tempfile::tempfile().unwrap();
    writeln!(file, "{}", capture_line("READ/RECV", 1, b"one")).unwrap();
    writeln!(file, "{}", capture_line("READ/RECV", 2, b"two")).unwrap();
    file.flush().unwrap();

    let mut reader = EventReader::new(BufReader::new(file));
    reader.rewind().unwrap();
    let first: Vec<_> = (&mut reader).map(|i| i.unwrap().raw_text).collect();
    assert_eq!(reader.line(), 2);

    reader.rewind().unwrap();
    let second: Vec<_> = (&mut reader).map(|i| i.unwrap().raw_text).collect();
    assert_eq!(first, vec!["one", "two"]);
    assert_eq!(first, second);
}

#[test]
fn open_missing_file_fails_with_path() {
    let err = EventReader::open("/no/such/capture.jsonl").err().unwrap();
    assert!(err.to_string().contains("Failed to open capture file"));
}
