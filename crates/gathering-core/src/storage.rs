//! Snapshot storage port and its adapters.
//!
//! The event store persists its whole collection as one JSON document under
//! a single well-known key. Backends only need to read and overwrite that
//! document; there are no partial updates.
//!
//! | Adapter | Backing | Use |
//! |---------|---------|-----|
//! | [`MemoryStorage`] | `BTreeMap` | tests, embedding |
//! | [`FileStorage`] | `<dir>/<key>.json` | the CLI |

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Default key under which the event collection is stored.
pub const DEFAULT_STORAGE_KEY: &str = "gathering.events";

/// A key-value slot holding full snapshots.
pub trait SnapshotStorage {
    /// Read the payload stored at `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the payload at `key`.
    fn write(&mut self, key: &str, payload: &str) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory
// =============================================================================

/// Process-local storage.
///
/// Can be switched into an unavailable state to exercise the
/// write-failure path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
    unavailable: bool,
}

impl MemoryStorage {
    /// Create empty storage.
    pub const fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            unavailable: false,
        }
    }

    /// Create storage with `payload` already stored at `key`.
    pub fn with_slot(key: &str, payload: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.slots.insert(key.to_owned(), payload.into());
        storage
    }

    /// Make subsequent writes fail (or succeed again).
    pub const fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Borrow the raw payload at `key`.
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable(
                "storage quota exceeded".to_owned(),
            ));
        }
        self.slots.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}

// =============================================================================
// Filesystem
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file which is then renamed over the
/// snapshot, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage root. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key: {key:?}"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!(path = %path.display(), bytes = payload.len(), "Snapshot written");
        Ok(())
    }
}
