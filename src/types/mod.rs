//! Type definitions module
//!
//! Wire and persistence types for chat exchanges and model discovery.

pub mod messages;
pub mod models;

// Re-export commonly used types
pub use messages::{ChatMessage, ChatRequest, ExchangeResult, HistoryRecord, Role};
pub use models::{ModelInfo, ModelListing};
