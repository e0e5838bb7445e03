//! Error types for blob writing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur while writing blob files.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The blob directory could not be created.
    #[error("failed to create blob directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blob file could not be written.
    #[error("failed to write blob {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
