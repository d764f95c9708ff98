//! Incremental event-stream parser for chat completion responses
//!
//! Two stages:
//! - [`LineBuffer`] frames arbitrary byte chunks into complete text lines
//! - [`decode_line`] turns one `data: <json>` line into typed deltas
//!
//! Decoding never fails. A line that is blank, not JSON, or missing
//! `choices[0].delta` simply yields nothing.

use serde::Deserialize;
use serde_json::Value;

/// Maximum bytes held for a single unterminated line (1MB)
pub const MAX_LINE_SIZE: usize = 1_048_576;

/// Prefix of an event-stream data line
const DATA_PREFIX: &str = "data: ";

/// End-of-stream sentinel payload
const DONE_SENTINEL: &str = "[DONE]";

/// An incremental fragment of a streamed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamDelta {
    /// Intermediate "thinking" text
    Reasoning(String),

    /// Final answer text
    Content(String),

    /// `[DONE]` seen or source exhausted
    EndOfStream,
}

/// Incremental line framer
///
/// Accumulates bytes and hands out every complete `\n`-terminated line
/// (with a trailing `\r` removed). Bytes are only decoded as UTF-8 once a
/// whole line is present, so multi-byte characters split across network
/// chunks survive intact.
#[derive(Debug)]
pub struct LineBuffer {
    /// Accumulation buffer
    buffer: Vec<u8>,

    /// Maximum buffer size
    max_line_size: usize,
}

impl LineBuffer {
    /// Create new line buffer with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINE_SIZE)
    }

    /// Create line buffer with custom maximum line length
    pub fn with_capacity(max_line_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_line_size,
        }
    }

    /// Add bytes and return every line they complete
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(Self::decode(&raw[..raw.len() - 1]));
        }

        // A runaway line cannot be a valid event; drop what we have so
        // memory stays bounded, and resync on the next newline.
        if self.buffer.len() > self.max_line_size {
            tracing::debug!(
                size = self.buffer.len(),
                max = self.max_line_size,
                "discarding oversized stream line"
            );
            self.buffer.clear();
        }

        lines
    }

    /// Flush a final unterminated line, if any
    pub fn finish(&mut self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.buffer);
        Some(Self::decode(&raw))
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn decode(raw: &[u8]) -> String {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        String::from_utf8_lossy(raw).into_owned()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Event envelope: `{"choices": [{"delta": {...}}]}`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Option<Delta>,
}

/// Fields are loose so a malformed one does not take its sibling down with it
#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    reasoning: Option<Value>,
    #[serde(default)]
    content: Option<Value>,
}

/// Non-empty string payload, anything else is ignored
fn text(field: Option<Value>) -> Option<String> {
    match field {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        _ => None,
    }
}

/// Decode one stream line into zero, one or two deltas.
///
/// Reasoning is emitted before content when both are present.
/// The `data: ` prefix is optional; a line with another prefix is parsed
/// as-is and, failing that, skipped.
pub fn decode_line(line: &str) -> Vec<StreamDelta> {
    if line.trim().is_empty() {
        return Vec::new();
    }

    let payload = line.strip_prefix(DATA_PREFIX).unwrap_or(line);
    if payload.trim() == DONE_SENTINEL {
        return vec![StreamDelta::EndOfStream];
    }

    let envelope: Envelope = match serde_json::from_str(payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::debug!(error = %e, line, "skipping undecodable stream line");
            return Vec::new();
        }
    };

    let Some(delta) = envelope.choices.into_iter().next().and_then(|c| c.delta) else {
        return Vec::new();
    };

    let mut deltas = Vec::with_capacity(2);
    if let Some(reasoning) = text(delta.reasoning) {
        deltas.push(StreamDelta::Reasoning(reasoning));
    }
    if let Some(content) = text(delta.content) {
        deltas.push(StreamDelta::Content(content));
    }
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push(b"data: {}\n");
        assert_eq!(lines, vec!["data: {}".to_string()]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_incremental_lines() {
        let mut buffer = LineBuffer::new();

        assert!(buffer.push(b"data: {\"cho").is_empty());
        assert!(buffer.push(b"ices\":[]}").is_empty());
        assert!(!buffer.is_empty());

        let lines = buffer.push(b"\r\n\ndata: [DONE]\n");
        assert_eq!(
            lines,
            vec![
                "data: {\"choices\":[]}".to_string(),
                String::new(),
                "data: [DONE]".to_string(),
            ]
        );
    }

    #[test]
    fn test_split_multibyte_character() {
        let mut buffer = LineBuffer::new();
        let text = "data: é\n".as_bytes();

        // Split inside the two-byte 'é'
        assert!(buffer.push(&text[..7]).is_empty());
        let lines = buffer.push(&text[7..]);
        assert_eq!(lines, vec!["data: é".to_string()]);
    }

    #[test]
    fn test_finish_flushes_tail() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"data: [DONE]").is_empty());
        assert_eq!(buffer.finish().as_deref(), Some("data: [DONE]"));
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn test_oversized_line_dropped() {
        let mut buffer = LineBuffer::with_capacity(16);
        assert!(buffer.push(&[b'a'; 32]).is_empty());
        assert!(buffer.is_empty());

        let lines = buffer.push(b"tail\ndata: x\n");
        assert_eq!(lines, vec!["tail".to_string(), "data: x".to_string()]);
    }

    #[test]
    fn test_decode_content() {
        let deltas = decode_line(r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#);
        assert_eq!(deltas, vec![StreamDelta::Content("hi".to_string())]);
    }

    #[test]
    fn test_decode_reasoning_before_content() {
        let deltas =
            decode_line(r#"data: {"choices":[{"delta":{"content":"b","reasoning":"a"}}]}"#);
        assert_eq!(
            deltas,
            vec![
                StreamDelta::Reasoning("a".to_string()),
                StreamDelta::Content("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_without_prefix() {
        let deltas = decode_line(r#"{"choices":[{"delta":{"reasoning":"hmm"}}]}"#);
        assert_eq!(deltas, vec![StreamDelta::Reasoning("hmm".to_string())]);
    }

    #[test]
    fn test_decode_done() {
        assert_eq!(decode_line("data: [DONE]"), vec![StreamDelta::EndOfStream]);
    }

    #[test]
    fn test_decode_skips_noise() {
        assert!(decode_line("").is_empty());
        assert!(decode_line("   ").is_empty());
        assert!(decode_line("data: not-json").is_empty());
        assert!(decode_line(": OPENROUTER PROCESSING").is_empty());
        assert!(decode_line("event: message").is_empty());
        assert!(decode_line(r#"data: {"choices":[]}"#).is_empty());
        assert!(decode_line(r#"data: {"id":"gen-1"}"#).is_empty());
        assert!(decode_line(r#"data: {"choices":[{"finish_reason":"stop"}]}"#).is_empty());
    }

    #[test]
    fn test_decode_ignores_empty_and_null_fields() {
        let deltas = decode_line(
            r#"data: {"choices":[{"delta":{"role":"assistant","content":"","reasoning":null}}]}"#,
        );
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_decode_wrong_field_type_is_ignored() {
        assert!(decode_line(r#"data: {"choices":[{"delta":{"content":42}}]}"#).is_empty());
    }

    #[test]
    fn test_decode_wrong_field_type_keeps_sibling() {
        assert_eq!(
            decode_line(r#"data: {"choices":[{"delta":{"reasoning":"a","content":42}}]}"#),
            vec![StreamDelta::Reasoning("a".to_string())]
        );
        assert_eq!(
            decode_line(r#"data: {"choices":[{"delta":{"reasoning":["x"],"content":"b"}}]}"#),
            vec![StreamDelta::Content("b".to_string())]
        );
    }
}
