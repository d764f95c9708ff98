//! Streaming client module
//!
//! Provides the OpenRouter API client, the event-stream decoder and the
//! terminal renderer for chat responses.

pub mod client;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use client::{CompletionMessage, OpenRouterClient};
pub use parser::{decode_line, LineBuffer, StreamDelta, MAX_LINE_SIZE};
pub use render::{render_message, render_stream, Renderer, THINK_CLOSE, THINK_OPEN};
