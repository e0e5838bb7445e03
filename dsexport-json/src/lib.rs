//! Destination tree and JSON rendering for dsexport.
//!
//! Decoded entities are collected into an [`EntityTree`] keyed by their key
//! path, then rendered to JSON by a [`JsonSerializer`]. Values without a
//! JSON form go through [`JsonSerializer::fallback`]: timestamps become
//! epoch milliseconds and blobs are written to side files.

mod config;
mod error;
mod serialize;
mod tree;

pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use serialize::{JsonSerializer, epoch_millis, naive_epoch_millis};
pub use tree::{EntityTree, resolve_dest};
