//! File-based conversation log — a JSON array of `[speaker, text]` pairs.
//!
//! The whole array is read, extended, and written back on every append, so
//! the file is always a single valid JSON document.
//!
//! Storage location: `~/.parley/history.json`
//!
//! A missing or unreadable log is re-created empty. A log that fails to
//! decode is copied verbatim to `<path>.swp` before being replaced.

use async_trait::async_trait;
use parley_core::error::HistoryError;
use parley_core::history::{ConversationLog, TurnRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Suffix of the sibling file that keeps the last corrupt log contents.
pub const BACKUP_SUFFIX: &str = ".swp";

/// A file-backed conversation log.
pub struct JsonHistoryLog {
    path: PathBuf,
}

impl JsonHistoryLog {
    /// Create a log at the given path. Nothing is touched until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where corrupt contents are preserved: the log path plus `.swp`.
    pub fn backup_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(BACKUP_SUFFIX);
        PathBuf::from(path)
    }

    /// Read the current log, repairing it if missing or corrupt.
    fn load_or_recover(&self) -> Result<Vec<TurnRecord>, HistoryError> {
        let content = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    warn!(path = %self.path.display(), "No history file yet, starting a new log");
                } else {
                    error!(path = %self.path.display(), error = %e, "History unreadable, starting a new log");
                }
                self.write(&[])?;
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice::<Vec<TurnRecord>>(&content) {
            Ok(history) => Ok(history),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "History is corrupt");
                let backup = self.backup_path();
                info!(backup = %backup.display(), "Saving corrupt history before overwriting");
                std::fs::write(&backup, &content).map_err(|e| HistoryError::Write {
                    path: backup.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the log with the given records.
    fn write(&self, history: &[TurnRecord]) -> Result<(), HistoryError> {
        let write_err = |reason: String| HistoryError::Write {
            path: self.path.clone(),
            reason,
        };

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_err(format!("Failed to create history directory: {e}")))?;
        }

        let content = serde_json::to_vec(history)
            .map_err(|e| write_err(format!("Failed to serialize history: {e}")))?;

        std::fs::write(&self.path, content).map_err(|e| write_err(e.to_string()))?;
        debug!(path = %self.path.display(), records = history.len(), "History written");
        Ok(())
    }
}

#[async_trait]
impl ConversationLog for JsonHistoryLog {
    fn name(&self) -> &str {
        "json"
    }

    async fn append(&self, statement: &str, reply: &str) -> Result<(), HistoryError> {
        let mut history = self.load_or_recover()?;
        history.push(TurnRecord::user(statement));
        history.push(TurnRecord::bot(reply));
        self.write(&history)
    }

    async fn history(&self) -> Result<Vec<TurnRecord>, HistoryError> {
        let content = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HistoryError::Read {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_slice(&content).map_err(|e| HistoryError::Decode {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_in(dir: &TempDir) -> JsonHistoryLog {
        JsonHistoryLog::new(dir.path().join("history.json"))
    }

    #[tokio::test]
    async fn missing_file_is_created_with_one_pair() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);

        log.append("Hi", "Hello!").await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, r#"[["user","Hi"],["bot","Hello!"]]"#);
        assert!(!log.backup_path().exists());
    }

    #[tokio::test]
    async fn appends_accumulate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);

        log.append("one", "1").await.unwrap();
        log.append("two", "2").await.unwrap();

        let history = log.history().await.unwrap();
        assert_eq!(
            history,
            vec![
                TurnRecord::user("one"),
                TurnRecord::bot("1"),
                TurnRecord::user("two"),
                TurnRecord::bot("2"),
            ]
        );
    }

    #[tokio::test]
    async fn corrupt_log_is_backed_up_and_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        let garbage = b"[[\"user\", \"Hi\"], oops not json";
        std::fs::write(log.path(), garbage).unwrap();

        log.append("Hi", "Hello!").await.unwrap();

        assert_eq!(std::fs::read(log.backup_path()).unwrap(), garbage);
        let history = log.history().await.unwrap();
        assert_eq!(history, vec![TurnRecord::user("Hi"), TurnRecord::bot("Hello!")]);
    }

    #[tokio::test]
    async fn wrong_shape_counts_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        std::fs::write(log.path(), r#"{"user": "Hi"}"#).unwrap();

        log.append("a", "b").await.unwrap();

        assert_eq!(std::fs::read_to_string(log.backup_path()).unwrap(), r#"{"user": "Hi"}"#);
        assert_eq!(log.history().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonHistoryLog::new(dir.path().join("nested").join("deeper").join("h.json"));
        log.append("x", "y").await.unwrap();
        assert!(log.path().exists());
    }

    #[tokio::test]
    async fn write_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read or overwritten as a file.
        let log = JsonHistoryLog::new(dir.path());
        let err = log.append("x", "y").await.unwrap_err();
        assert!(matches!(err, HistoryError::Write { .. }));
    }

    #[tokio::test]
    async fn history_of_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(log_in(&dir).history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_of_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        std::fs::write(log.path(), "nope").unwrap();
        assert!(matches!(
            log.history().await.unwrap_err(),
            HistoryError::Decode { .. }
        ));
    }

    #[test]
    fn backup_path_appends_suffix() {
        let log = JsonHistoryLog::new("/data/history.json");
        assert_eq!(log.backup_path(), PathBuf::from("/data/history.json.swp"));
    }
}
