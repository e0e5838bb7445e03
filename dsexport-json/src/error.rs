//! Error types for the exporter.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while building or rendering the destination tree.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A slot on the key path holds a non-mapping value.
    #[error("cannot nest {key} under {slot:?}: slot holds a {found} value")]
    PathConflict {
        key: String,
        slot: String,
        found: &'static str,
    },

    /// Key or value error.
    #[error(transparent)]
    Types(#[from] dsexport_types::Error),

    /// Record decoding error.
    #[error(transparent)]
    Entity(#[from] dsexport_entity::EntityError),

    /// Blob file error.
    #[error(transparent)]
    Blob(#[from] dsexport_blob::BlobError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
