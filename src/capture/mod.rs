//! Capture event model.
//!
//! One JSON object per line, written by the TLS capture agent:
//!
//! ```text
//! {"function":"WRITE/SEND","timestamp_ns":123,"comm":"curl","pid":42,"len":78,"data":"GET / HTTP/1.1\r\n..."}
//! ```
//!
//! Only `function`, `pid`, `len` and `data` matter for decoding. The other
//! fields are kept as optional metadata.
//!
//! # Default policy
//!
//! | Field      | Missing / null |
//! |------------|----------------|
//! | `function` | `"UNKNOWN"`    |
//! | `pid`      | `0`            |
//! | `len`      | `0`            |
//! | `data`     | `""`           |
//! | others     | `None`         |

mod reader;

pub use reader::EventReader;

use serde::{Deserialize, Serialize};

/// Function tag for data read from the peer.
pub const READ_FUNCTION: &str = "READ/RECV";
/// Function tag for data written to the peer.
pub const WRITE_FUNCTION: &str = "WRITE/SEND";
/// Tag used when the record has no `function` field.
pub const UNKNOWN_FUNCTION: &str = "UNKNOWN";

/// Record exactly as it appears on a log line.
///
/// Every field is optional; [`CaptureEvent::from`] applies the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub pid: Option<i64>,
    #[serde(default)]
    pub len: Option<i64>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub timestamp_ns: Option<u64>,
    #[serde(default)]
    pub comm: Option<String>,
    #[serde(default)]
    pub uid: Option<i64>,
    #[serde(default)]
    pub tid: Option<i64>,
    #[serde(default)]
    pub buf_size: Option<u64>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub is_handshake: Option<bool>,
    #[serde(default)]
    pub truncated: Option<bool>,
    #[serde(default)]
    pub bytes_lost: Option<i64>,
}

/// Agent-side metadata that is not needed for decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buf_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_handshake: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_lost: Option<i64>,
}

/// One captured read or write.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureEvent {
    /// 1-based line number in the log.
    pub line: usize,
    pub function: String,
    pub process_id: i64,
    pub declared_length: i64,
    pub raw_text: String,
    pub meta: EventMeta,
}

impl CaptureEvent {
    pub fn is_read(&self) -> bool {
        self.function == READ_FUNCTION
    }

    pub fn is_write(&self) -> bool {
        self.function == WRITE_FUNCTION
    }

    /// Whether the agent reported that the payload was cut short.
    pub fn is_truncated(&self) -> bool {
        self.meta.truncated.unwrap_or(false)
    }

    pub(crate) fn from_raw(line: usize, raw: RawRecord) -> Self {
        Self {
            line,
            function: raw
                .function
                .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
            process_id: raw.pid.unwrap_or(0),
            declared_length: raw.len.unwrap_or(0),
            raw_text: raw.data.unwrap_or_default(),
            meta: EventMeta {
                timestamp_ns: raw.timestamp_ns,
                comm: raw.comm,
                uid: raw.uid,
                tid: raw.tid,
                buf_size: raw.buf_size,
                latency_ms: raw.latency_ms,
                is_handshake: raw.is_handshake,
                truncated: raw.truncated,
                bytes_lost: raw.bytes_lost,
            },
        }
    }

    /// Parse one log line.
    ///
    /// The line must be a JSON object. Unknown fields are ignored; known
    /// fields with the wrong JSON type make the record malformed.
    pub fn from_json(line_no: usize, line: &str) -> Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
        if !value.is_object() {
            return Err("record must be a JSON object".to_string());
        }
        let raw: RawRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;
        Ok(Self::from_raw(line_no, raw))
    }
}
