//! Core type definitions for dsexport.
//!
//! This crate defines the plain data types shared by the record decoder,
//! the blob writer and the JSON exporter:
//! - Hierarchical datastore keys (kind / id-or-name paths)
//! - Tagged property values in their protobuf mapping form
//! - The exported value model that fills the destination tree
//!
//! Nothing here touches the filesystem or the wire format.

mod key;
mod text;
mod value;

pub mod encoding;

pub use key::{IdOrName, Key, PathElement};
pub use text::decode_utf8_ignore;
pub use value::{ExportValue, PointValue, PropertyMap, TaggedValue, UserValue};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid int64 literal: {0:?}")]
    InvalidInt64(String),

    #[error("invalid double literal: {0:?}")]
    InvalidDouble(String),

    #[error("incomplete key: {0}")]
    IncompleteKey(String),
}
