//! App-state persistence.
//!
//! Loading never fails: a missing document is a fresh install. A corrupt
//! one is read field by field, so a bad field only resets itself, and the
//! original bytes are copied to `state.json.corrupt` before the next save
//! can overwrite them. Only writes report errors.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::data_dir;
use crate::error::{Result, StorageError};
use crate::state::AppState;

pub trait StateStore {
    fn load(&self) -> AppState;
    fn save(&self, state: &AppState) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Pretty JSON document on disk, `<data_dir>/state.json` by default.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "state.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the default data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the last corrupt document is kept.
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    fn back_up(&self, content: &str) {
        let backup = self.backup_path();
        match std::fs::write(&backup, content) {
            Ok(()) => tracing::warn!(backup = %backup.display(), "kept a copy of the corrupt state"),
            Err(e) => tracing::warn!(backup = %backup.display(), error = %e, "could not back up corrupt state"),
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> AppState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return AppState::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "state unreadable, starting fresh");
                return AppState::default();
            }
        };
        match AppState::salvage_json(&content) {
            Ok(salvaged) if salvaged.discarded.is_empty() => salvaged.state,
            Ok(salvaged) => {
                tracing::warn!(
                    path = %self.path.display(),
                    discarded = ?salvaged.discarded,
                    "state partly corrupt, kept what parsed"
                );
                self.back_up(&content);
                salvaged.state
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "state corrupt, starting fresh");
                self.back_up(&content);
                AppState::default()
            }
        }
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let write_failed = |message: String| StorageError::WriteFailed {
            path: self.path.clone(),
            message,
        };
        let content = state.export_json()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
        }
        // Write beside the target and rename so a crash never leaves half a document.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| write_failed(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::ClearFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<AppState>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            saved: Mutex::new(Some(state)),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(None),
            fail_writes: true,
        }
    }

    /// The last state written, if any.
    pub fn saved(&self) -> Option<AppState> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn write_error(&self) -> StorageError {
        StorageError::WriteFailed {
            path: PathBuf::from(":memory:"),
            message: "writes disabled".into(),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> AppState {
        self.saved().unwrap_or_default()
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if self.fail_writes {
            return Err(self.write_error().into());
        }
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.fail_writes {
            return Err(self.write_error().into());
        }
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
