//! Content-addressed blob side files for dsexport.
//!
//! Binary property payloads are not inlined in the JSON output. Each one is
//! written once to `<dest_dir>/blob/<md5><ext>`, where the extension comes
//! from sniffing the content, and the JSON carries the relative path.

mod error;
mod writer;

pub mod sniff;

pub use error::{BlobError, BlobResult};
pub use sniff::{Sniffed, extension_for, sniff};
pub use writer::{BlobRef, BlobWriter, DEFAULT_BLOB_DIR};
