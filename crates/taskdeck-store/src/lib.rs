//! Key-value blob storage for taskdeck task lists.

pub mod codec;
pub mod error;

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use taskdeck_core::TaskList;
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::{debug, info};

pub use codec::{decode_tasks, encode_tasks};
pub use error::StoreError;

/// Namespace key the task list is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "modern-tasks";

const BLOB_EXTENSION: &str = "json";

/// Minimal key-value storage: whole values are read and overwritten, never patched.
pub trait BlobStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<B: BlobStore + ?Sized> BlobStore for &B {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Blob store keeping one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) the storage directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path backing `key`.
    ///
    /// # Errors
    /// Returns an error if the key cannot be used as a file name.
    pub fn blob_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{BLOB_EXTENSION}")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.blob_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Read blob");
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.blob_path(key)?;
        // Temp file in the same directory, then rename over the target.
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote blob");
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}

/// Process-local blob store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one blob.
    #[must_use]
    pub fn with_blob(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut blobs) = store.blobs.lock() {
            blobs.insert(key.to_owned(), value.to_owned());
        }
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self.blobs.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.lock().map_err(|_| StoreError::LockPoisoned)?;
        blobs.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Reads and writes the whole task list under a single key.
#[derive(Debug)]
pub struct TaskSnapshotStore<B> {
    blobs: B,
    key: String,
}

impl<B: BlobStore> TaskSnapshotStore<B> {
    /// Wrap a blob store, storing tasks under `key`.
    pub fn new(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    /// Storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying blob store.
    #[must_use]
    pub const fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Load the stored list. Missing or corrupt blobs produce an empty list.
    ///
    /// # Errors
    /// Returns an error only when the blob store itself cannot be read.
    pub fn load(&self, loaded_at: OffsetDateTime) -> Result<TaskList, StoreError> {
        let Some(raw) = self.blobs.get(&self.key)? else {
            debug!(key = %self.key, "No stored tasks; starting empty");
            return Ok(TaskList::new());
        };
        let list = decode_tasks(&raw, loaded_at);
        info!(key = %self.key, tasks = list.len(), "Loaded tasks");
        Ok(list)
    }

    /// Overwrite the stored list with `list`.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, list: &TaskList) -> Result<(), StoreError> {
        let encoded = encode_tasks(list)?;
        self.blobs.set(&self.key, &encoded)
    }
}
