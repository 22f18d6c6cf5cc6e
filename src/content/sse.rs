//! Server-sent event streams.
//!
//! Streaming chat APIs answer with `text/event-stream` bodies. Each block
//! carries `event:` and `data:` lines; the assistant text is spread across
//! many small deltas that have to be concatenated.

use serde_json::Value;

/// Data payload that terminates OpenAI-style streams.
const DONE_SENTINEL: &str = "[DONE]";

/// One SSE block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: Option<String>,
}

/// Result of folding a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub events: usize,
    pub message: Option<String>,
}

/// Split text into SSE blocks.
///
/// Multiple `data:` lines in one block are joined with `\n`. Blocks without
/// `event:` or `data:` lines are dropped.
pub fn parse_events(text: &str) -> Vec<SseEvent> {
    let normalized = text.replace("\r\n", "\n");
    let mut events = Vec::new();

    for block in normalized.split("\n\n") {
        let mut event = None;
        let mut data_lines = Vec::new();
        for line in block.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("event:") {
                event = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("data:") {
                data_lines.push(rest.trim());
            }
        }
        if event.is_none() && data_lines.is_empty() {
            continue;
        }
        events.push(SseEvent {
            event,
            data: (!data_lines.is_empty()).then(|| data_lines.join("\n")),
        });
    }

    events
}

/// Fold an event stream into its assistant text.
///
/// Returns `None` when the text holds no `data:` lines at all.
pub fn summarize(text: &str) -> Option<StreamSummary> {
    let events = parse_events(text);
    if !events.iter().any(|e| e.data.is_some()) {
        return None;
    }

    let mut message = String::new();
    for event in &events {
        let Some(data) = event.data.as_deref() else {
            continue;
        };
        if data == DONE_SENTINEL {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(data) else {
            continue;
        };
        if let Some(text) = delta_text(event.event.as_deref(), &value) {
            message.push_str(&text);
        }
    }

    Some(StreamSummary {
        events: events.len(),
        message: (!message.is_empty()).then_some(message),
    })
}

/// Text carried by one delta payload, for either chat-completion chunks
/// (`choices[].delta.content`) or content-block deltas (`text_delta`).
fn delta_text(event_name: Option<&str>, value: &Value) -> Option<String> {
    if let Some(choices) = value.get("choices").and_then(Value::as_array) {
        let text: String = choices
            .iter()
            .filter_map(|c| c.get("delta")?.get("content")?.as_str())
            .collect();
        return (!text.is_empty()).then_some(text);
    }

    let kind = event_name.or_else(|| value.get("type").and_then(Value::as_str));
    if kind != Some("content_block_delta") {
        return None;
    }
    let delta = value.get("delta")?;
    if delta.get("type").and_then(Value::as_str) != Some("text_delta") {
        return None;
    }
    delta.get("text").and_then(Value::as_str).map(str::to_string)
}
