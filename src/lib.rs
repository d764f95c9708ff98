//! openrouter-cli - OpenRouter chat client for the terminal
//!
//! Sends a single-turn prompt to a hosted model, renders the reply as it
//! streams (reasoning inside `<think>` markers, then content), and can
//! append the exchange to a local JSON-lines history.
//!
//! # Architecture
//!
//! - **streaming**: HTTP client, event-stream decoder, terminal renderer
//! - **history**: best-effort append-only log
//! - **commands**: `chat`, `list-models`, `list-models-json`, `list-models-ids`
//! - **cli**: argument parsing and TOML configuration

pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{CliError, Result};

pub mod cli;
pub mod commands;
pub mod history;
pub mod streaming;
