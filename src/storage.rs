//! Durable storage for the task state.
//!
//! The entire collection lives in a single schema-versioned JSON file,
//! `tasks.json`, inside the data directory. Every store mutation rewrites
//! the file atomically under a flock; on startup the file is read back and
//! an absent or unreadable file yields an empty collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::store::StatePersister;
use crate::task::Task;

/// Fixed name of the state file inside the data directory.
pub const STATE_FILE: &str = "tasks.json";

const STATE_SCHEMA_VERSION: &str = "taskdash.tasks.v1";

/// On-disk wrapper around the ordered task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    pub schema_version: String,
    pub saved_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl StateFile {
    fn new(tasks: Vec<Task>) -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            tasks,
        }
    }
}

/// Platform data directory for taskdash (e.g. `~/.local/share/taskdash`).
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "taskdash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::OperationFailed("could not determine a data directory".to_string()))
}

/// JSON-file persister backing the production store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }
}

impl StatePersister for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        let content = fs::read_to_string(&self.path)?;
        let state: StateFile = serde_json::from_str(&content)?;
        if state.schema_version != STATE_SCHEMA_VERSION {
            return Err(Error::OperationFailed(format!(
                "unsupported state schema '{}'",
                state.schema_version
            )));
        }
        Ok(Some(state.tasks))
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let state = StateFile::new(tasks.to_vec());
        let json = serde_json::to_string_pretty(&state)?;

        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        lock::write_atomic(&self.path, json.as_bytes())
    }
}
