//! Append-only local history of chat exchanges
//!
//! One JSON array of messages per line. The file is never read back,
//! rotated or locked; concurrent writers may interleave.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::types::HistoryRecord;

/// History log at a fixed path
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, best effort.
    ///
    /// Returns whether the write went through. Failures are logged at
    /// debug level only and never reach the caller as an error.
    pub fn append(&self, record: &HistoryRecord) -> bool {
        match self.try_append(record) {
            Ok(()) => true,
            Err(e) => {
                let reason = format!("{:#}", e);
                tracing::debug!(error = %reason, "history append failed");
                false
            }
        }
    }

    fn try_append(&self, record: &HistoryRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("Failed to serialize history")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        file.write_all(line.as_bytes())
            .context("Failed to write history line")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExchangeResult;

    fn record(prompt: &str) -> HistoryRecord {
        HistoryRecord::exchange(prompt, &ExchangeResult::new("answer", "thought"))
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("history.jsonl"));

        assert!(log.append(&record("first")));
        assert!(log.append(&record("second")));

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first[0]["role"], "user");
        assert_eq!(first[0]["content"], "first");
        assert_eq!(first[1]["role"], "assistant");
        assert_eq!(first[1]["reasoning"], "thought");
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_append_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("missing").join("history.jsonl"));

        assert!(!log.append(&record("lost")));
        assert!(!log.path().exists());
    }

    #[test]
    fn test_directory_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path());
        assert!(!log.append(&record("lost")));
    }
}
