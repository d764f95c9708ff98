//! Message types for chat exchanges
//!
//! Defines the messages sent to the chat completions endpoint and the
//! records appended to the local history log.

use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,

    /// Provider-exposed reasoning, only kept for assistant turns in history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ChatMessage {
    /// User turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            reasoning: None,
        }
    }

    /// Assistant turn carrying both channels of an exchange
    pub fn assistant(content: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            reasoning: Some(reasoning.into()),
        }
    }
}

/// Body of `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
}

/// Final text of one exchange, both channels trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeResult {
    pub content: String,
    pub reasoning: String,
}

impl ExchangeResult {
    pub fn new(content: &str, reasoning: &str) -> Self {
        Self {
            content: content.trim().to_string(),
            reasoning: reasoning.trim().to_string(),
        }
    }
}

/// One line of the history log: the full message sequence of an exchange
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct HistoryRecord {
    pub messages: Vec<ChatMessage>,
}

impl HistoryRecord {
    /// Build the two-message record for a single-turn exchange
    pub fn exchange(prompt: &str, result: &ExchangeResult) -> Self {
        Self {
            messages: vec![
                ChatMessage::user(prompt),
                ChatMessage::assistant(result.content.clone(), result.reasoning.clone()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_reasoning_for_user_turn() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "qwen/qwen3-14b:free",
            messages: &messages,
            stream: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "qwen/qwen3-14b:free",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": true
            })
        );
    }

    #[test]
    fn test_exchange_result_trims_both_channels() {
        let result = ExchangeResult::new("  answer\n", "\n thought ");
        assert_eq!(result.content, "answer");
        assert_eq!(result.reasoning, "thought");
    }

    #[test]
    fn test_history_record_is_plain_array() {
        let result = ExchangeResult::new("Hello", "thinking...");
        let record = HistoryRecord::exchange("Say hi", &result);

        let line = serde_json::to_string(&record).unwrap();
        assert_eq!(
            line,
            r#"[{"role":"user","content":"Say hi"},{"role":"assistant","content":"Hello","reasoning":"thinking..."}]"#
        );
    }

    #[test]
    fn test_role_parses_lowercase() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"system","content":"be brief"}"#).unwrap();
        assert_eq!(msg.role, Role::System);
        assert!(msg.reasoning.is_none());
    }
}
