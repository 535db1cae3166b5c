//! Error types for taskdeck blob store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing blobs.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key is empty or contains characters that cannot be used as a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Failed to serialize the task list.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to replace the blob file atomically.
    #[error("Failed to persist blob: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// In-memory store lock was poisoned.
    #[error("Blob store lock poisoned")]
    LockPoisoned,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
