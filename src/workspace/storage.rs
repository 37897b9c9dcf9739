//! Snapshot persistence for the workspace

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use super::Workspace;

/// Errors that can occur while reading or writing a snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the workspace snapshot lives
pub trait SnapshotStore {
    /// Read the snapshot. `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Workspace>, StorageError>;

    /// Overwrite the snapshot
    fn save(&mut self, workspace: &Workspace) -> Result<(), StorageError>;

    /// Forget the snapshot
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Snapshot stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Workspace>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&mut self, workspace: &Workspace) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let json = serde_json::to_string_pretty(workspace)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory snapshot slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with arbitrary raw snapshot text
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Rc::new(RefCell::new(Some(raw.into()))),
        }
    }

    /// Raw snapshot text, if any
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Workspace>, StorageError> {
        match self.raw.borrow().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, workspace: &Workspace) -> Result<(), StorageError> {
        let json = serde_json::to_string(workspace)?;
        *self.raw.borrow_mut() = Some(json);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        *self.raw.borrow_mut() = None;
        Ok(())
    }
}
