//! Durable per-channel progress tracking
//!
//! A single JSON file maps channel username to the last processed message
//! id. The value at rest always names a record that is already in the log:
//! the orchestrator appends first and advances the checkpoint second, so a
//! crash between the two re-delivers at most the in-flight message.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from checkpoint persistence. Channel-fatal: progress already
/// written stays valid, but no further advancement is recorded.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable mapping from channel username to last processed message id
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    last_ids: HashMap<String, i64>,
}

impl CheckpointStore {
    /// Load all checkpoints from the backing file.
    ///
    /// A missing file means no channel has started yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let last_ids = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), channels = last_ids.len(), "checkpoints loaded");
        Ok(Self { path, last_ids })
    }

    /// Last processed message id for a channel, `None` if not yet started
    pub fn get(&self, channel_id: &str) -> Option<i64> {
        self.last_ids.get(channel_id).copied()
    }

    /// Upsert the checkpoint for a channel and persist it durably.
    ///
    /// The write is atomic: content goes to a sibling temp file, is synced,
    /// and renamed over the live file, so a reader never observes a partial
    /// or corrupt checkpoint file. Checkpoints only move forward; a
    /// regression is ignored with a warning.
    pub fn set(&mut self, channel_id: &str, message_id: i64) -> Result<(), PersistenceError> {
        let current = self.last_ids.get(channel_id).copied();
        if current.is_some_and(|last| message_id < last) {
            warn!(
                channel = channel_id,
                message_id,
                last = current,
                "ignoring checkpoint regression"
            );
            return Ok(());
        }

        self.last_ids.insert(channel_id.to_string(), message_id);
        self.persist()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Single writer per process, so a fixed temp name next to the live
        // file is safe and keeps the rename on one filesystem.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(&self.last_ids)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::load(dir.path().join("checkpoints.json")).unwrap();
        assert_eq!(store.get("doctorset"), None);
    }

    #[test]
    fn test_set_then_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.json");

        let mut store = CheckpointStore::load(&path).unwrap();
        store.set("doctorset", 42).unwrap();
        store.set("chemed123", 7).unwrap();

        let reloaded = CheckpointStore::load(&path).unwrap();
        assert_eq!(reloaded.get("doctorset"), Some(42));
        assert_eq!(reloaded.get("chemed123"), Some(7));
    }

    #[test]
    fn test_set_persists_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.json");

        let mut store = CheckpointStore::load(&path).unwrap();
        store.set("doctorset", 1).unwrap();

        // A reader opening the file between individual sets already sees
        // the first advancement.
        let mid_run = CheckpointStore::load(&path).unwrap();
        assert_eq!(mid_run.get("doctorset"), Some(1));

        store.set("doctorset", 2).unwrap();
        let after = CheckpointStore::load(&path).unwrap();
        assert_eq!(after.get("doctorset"), Some(2));
    }

    #[test]
    fn test_regression_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.json");

        let mut store = CheckpointStore::load(&path).unwrap();
        store.set("doctorset", 42).unwrap();
        store.set("doctorset", 10).unwrap();

        assert_eq!(store.get("doctorset"), Some(42));
        let reloaded = CheckpointStore::load(&path).unwrap();
        assert_eq!(reloaded.get("doctorset"), Some(42));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints.json");

        let mut store = CheckpointStore::load(&path).unwrap();
        store.set("doctorset", 5).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("checkpoints.json");

        let mut store = CheckpointStore::load(&path).unwrap();
        store.set("doctorset", 5).unwrap();
        assert!(path.exists());
    }
}
