//! Error types for the anotherpad library.
//!
//! Store operations never surface these to their callers; they are returned by
//! the storage backends and the persistence helpers, and logged by the stores.
//! The command-line front end uses the lookup variants to report misses.

use std::io;

use thiserror::Error;

/// The main error type for the anotherpad library.
#[derive(Error, Debug)]
pub enum PadError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A write would push the backend past its configured quota.
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    StorageFull {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// Storage key cannot be mapped onto the backend.
    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// Folder was not found when performing an operation.
    #[error("Folder not found: {id}")]
    FolderNotFound { id: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// for mutex lock acquisition issues
    #[error("{message}")]
    LockAcquisitionFailed { message: String },
}
