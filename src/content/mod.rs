//! Content interpretation for decoded bodies.
//!
//! Bodies are tried as JSON first, then as a server-sent event stream, and
//! otherwise kept as plain text. A mismatch is a classification, not an
//! error: most captured payloads are not API responses.

pub mod sse;

use serde_json::Value;
use tracing::debug;

use crate::error::DecodeError;

/// What a body turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A single JSON document.
    Json {
        value: Value,
        pretty: String,
        message: Option<String>,
    },
    /// A `text/event-stream` body.
    EventStream {
        events: usize,
        message: Option<String>,
    },
    /// Anything else, shown as-is.
    Text(String),
}

impl Content {
    /// Assistant text extracted from the content, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Content::Json { message, .. } | Content::EventStream { message, .. } => {
                message.as_deref()
            }
            Content::Text(_) => None,
        }
    }

    /// The parsed document for JSON content.
    pub fn structured(&self) -> Option<&Value> {
        match self {
            Content::Json { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Interpret body text. Never fails.
pub fn interpret(text: &str) -> Content {
    match parse_structured(text) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string());
            let message = extract_chat_message(&value);
            Content::Json {
                value,
                pretty,
                message,
            }
        }
        Err(err) => {
            debug!(error = %err, "body is not a JSON document");
            match sse::summarize(text) {
                Some(stream) => Content::EventStream {
                    events: stream.events,
                    message: stream.message,
                },
                None => Content::Text(text.to_string()),
            }
        }
    }
}

/// Parse text as a JSON document.
pub fn parse_structured(text: &str) -> Result<Value, DecodeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::ContentParseMismatch {
            reason: "empty body".to_string(),
        });
    }
    serde_json::from_str(trimmed).map_err(|e| DecodeError::ContentParseMismatch {
        reason: e.to_string(),
    })
}

/// Pull `choices[i].message.content` out of a chat-completion response.
///
/// Takes the first choice that carries a string content field.
pub fn extract_chat_message(value: &Value) -> Option<String> {
    value
        .get("choices")?
        .as_array()?
        .iter()
        .find_map(|choice| choice.get("message")?.get("content")?.as_str())
        .map(str::to_string)
}
