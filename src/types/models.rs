//! Type definitions for model discovery
//!
//! The listing is kept as raw JSON so `list-models-json` can echo it back
//! untouched; typed [`ModelInfo`] views are derived on demand.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Information about a remote model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model identifier (e.g., "qwen/qwen3-14b:free")
    pub id: String,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelInfo {
    /// One row of the `list-models` table: id padded to 50 columns
    pub fn table_row(&self) -> String {
        format!("{:<50} {}", self.id, self.description.as_deref().unwrap_or(""))
    }
}

/// The `data` array of `GET /models`, as received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelListing {
    entries: Vec<Value>,
}

impl ModelListing {
    /// Extract the listing from a response body; a missing `data` is empty
    pub fn from_body(body: Value) -> Self {
        let entries = match body {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(entries)) => entries,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self { entries }
    }

    /// Raw entries in server order
    pub fn raw(&self) -> &[Value] {
        &self.entries
    }

    /// Typed view over every entry; an entry without an `id` is an error
    pub fn models(&self) -> Result<Vec<ModelInfo>> {
        self.entries
            .iter()
            .map(|entry| Ok(ModelInfo::deserialize(entry)?))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
