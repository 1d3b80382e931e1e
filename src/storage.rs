//! Storage
//!
//! Durable key/value state for the client-side stores. Each store reads its key once when it is
//! opened and writes its full state back after every change. Write failures never reach the
//! caller: the in-memory state stays correct for the rest of the session and the failure is
//! logged.
//!
//! Separate processes sharing a storage location are not coordinated; the last write wins.

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying storage could not be read or written.
    #[error("storage IO failed: {0}")]
    Io(#[from] io::Error),

    /// Stored state could not be encoded or decoded.
    #[error("stored state is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),

    /// The key cannot be used as a storage location.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Durable per-client key/value storage.
pub trait Storage {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Decode the JSON value stored under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if the value cannot be read or decoded.
pub fn load_json<T: DeserializeOwned>(
    storage: &impl Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .read(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if the value cannot be encoded or written.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut impl Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;

    storage.write(key, &raw)
}

/// Write `value` through to storage, logging and swallowing any failure.
///
/// Returns whether the write succeeded.
pub fn write_through<T: Serialize + ?Sized>(
    storage: &mut impl Storage,
    key: &str,
    value: &T,
) -> bool {
    match save_json(storage, key, value) {
        Ok(()) => {
            debug!(key, "persisted state");
            true
        }
        Err(error) => {
            warn!(key, %error, "failed to persist state; changes will not survive a reload");
            false
        }
    }
}

/// Read the state stored under `key`, falling back to the default when it is missing or
/// unreadable.
pub fn hydrate<T: DeserializeOwned + Default>(storage: &impl Storage, key: &str) -> T {
    match load_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(error) => {
            warn!(key, %error, "discarding unreadable stored state");
            T::default()
        }
    }
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Storage backed by one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`, which is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the state files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir)?;
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }
}
