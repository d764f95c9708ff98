//! Error types for openrouter-cli
//!
//! Transport and command failures propagate through [`CliError`].
//! Per-line stream decoding and history persistence have no error channel
//! of their own: a bad stream line yields no delta, a failed history write
//! is logged and dropped.

use thiserror::Error;

/// Main error type for the command layer and transport
#[derive(Error, Debug)]
pub enum CliError {
    /// Remote API answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Network-level failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat invoked with nothing to send
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Generic(format!("{:#}", err))
    }
}
