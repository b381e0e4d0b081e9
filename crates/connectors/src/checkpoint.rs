//! Checkpoint persistence
//!
//! A checkpoint is the exclusive lower bound of a source's next fetch window.
//! The file store keeps every source's checkpoint in one JSON document:
//!
//! ```json
//! {
//!   "jira_cloud": "2024-05-01T08:00:00.000000Z"
//! }
//! ```
//!
//! Writes go to a temp file that is renamed over the original, under a lock
//! shared by every source using the same store.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use siphon_protocol::{format_timestamp, parse_timestamp};
use thiserror::Error;

#[cfg(test)]
#[path = "checkpoint_test.rs"]
mod tests;

/// Errors from a checkpoint store
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkpoint file '{path}' is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("checkpoint for '{key}' has invalid timestamp '{value}'")]
    InvalidTimestamp { key: String, value: String },
}

/// Key/value store of per-source checkpoints
pub trait CheckpointStore: Send + Sync {
    /// Last persisted checkpoint for `key`
    fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, CheckpointError>;

    /// Persist `ts` as the checkpoint for `key`
    fn set(&self, key: &str, ts: DateTime<Utc>) -> Result<(), CheckpointError>;
}

/// JSON-file backed checkpoint store
#[derive(Debug)]
pub struct FileCheckpointStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open a store, rejecting an existing file that cannot be read back
    ///
    /// A missing or empty file is fine. Every stored value must be a valid
    /// timestamp; otherwise no source using the store could ever persist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let store = Self::new(path);
        let entries = store.read_all()?;
        for (key, value) in &entries {
            if parse_timestamp(value).is_err() {
                return Err(CheckpointError::InvalidTimestamp {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CheckpointError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(CheckpointError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| CheckpointError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CheckpointError> {
        let io_err = |source| CheckpointError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let file = File::create(&temp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, entries).map_err(|e| {
            CheckpointError::Corrupt {
                path: temp_path.clone(),
                source: e,
            }
        })?;
        writer.flush().map_err(io_err)?;
        writer.get_ref().sync_all().map_err(io_err)?;

        fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, CheckpointError> {
        let _guard = self.lock.lock();
        let entries = self.read_all()?;
        entries
            .get(key)
            .map(|value| {
                parse_timestamp(value).map_err(|_| CheckpointError::InvalidTimestamp {
                    key: key.to_string(),
                    value: value.clone(),
                })
            })
            .transpose()
    }

    fn set(&self, key: &str, ts: DateTime<Utc>) -> Result<(), CheckpointError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), format_timestamp(&ts));
        self.write_all(&entries)
    }
}

/// In-memory checkpoint store (one-shot pulls and tests)
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, CheckpointError> {
        Ok(self.entries.lock().get(key).copied())
    }

    fn set(&self, key: &str, ts: DateTime<Utc>) -> Result<(), CheckpointError> {
        self.entries.lock().insert(key.to_string(), ts);
        Ok(())
    }
}
