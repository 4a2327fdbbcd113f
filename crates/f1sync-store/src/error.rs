//! Store errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Another f1sync run holds the lock (PID: {pid}, lock file: {path})")]
    Locked { path: PathBuf, pid: u32 },

    #[error("Failed to access lock file {path}: {reason}")]
    LockFile { path: PathBuf, reason: String },

    #[error("Serialization error for {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
