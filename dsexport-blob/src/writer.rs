//! Content-addressed blob writer.

use crate::sniff::{extension_for, sniff};
use crate::{BlobError, BlobResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the blob subdirectory under the destination directory.
pub const DEFAULT_BLOB_DIR: &str = "blob";

/// Where a blob was written and what it was detected as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// md5 hex digest of the content.
    pub digest: String,
    pub mime_type: String,
    /// Extension with leading dot, or empty.
    pub extension: String,
    /// `<digest><extension>`.
    pub file_name: String,
    /// `<blob dir name>/<file name>`, always with a forward slash.
    pub relative_path: String,
    pub size: u64,
}

/// Writes binary payloads to `<dest_dir>/<dir_name>/<md5><ext>`.
///
/// The file name depends only on content, so writing the same bytes twice
/// lands on the same file. A colliding file is overwritten.
#[derive(Debug, Clone)]
pub struct BlobWriter {
    dest_dir: PathBuf,
    dir_name: String,
    drop_generic_extension: bool,
}

impl BlobWriter {
    /// Creates a writer for `<dest_dir>/blob`.
    pub fn new(dest_dir: impl AsRef<Path>) -> Self {
        Self {
            dest_dir: dest_dir.as_ref().to_path_buf(),
            dir_name: DEFAULT_BLOB_DIR.to_string(),
            drop_generic_extension: true,
        }
    }

    /// Uses a different subdirectory name.
    #[must_use]
    pub fn with_dir_name(mut self, dir_name: impl Into<String>) -> Self {
        self.dir_name = dir_name.into();
        self
    }

    /// Keeps `.bin` on generic binary payloads instead of dropping it.
    #[must_use]
    pub fn drop_generic_extension(mut self, drop: bool) -> Self {
        self.drop_generic_extension = drop;
        self
    }

    /// Absolute (or dest-relative) directory blobs are written to.
    #[must_use]
    pub fn blob_dir(&self) -> PathBuf {
        self.dest_dir.join(&self.dir_name)
    }

    /// Computes the name a payload would be stored under, without writing.
    #[must_use]
    pub fn describe(&self, bytes: &[u8]) -> BlobRef {
        let digest = format!("{:x}", md5::compute(bytes));
        let sniffed = sniff(bytes);
        let extension = extension_for(
            sniffed.mime_type,
            sniffed.extension_hint,
            self.drop_generic_extension,
        );
        let file_name = format!("{digest}{extension}");
        BlobRef {
            relative_path: format!("{}/{}", self.dir_name, file_name),
            digest,
            mime_type: sniffed.mime_type.to_string(),
            extension,
            file_name,
            size: bytes.len() as u64,
        }
    }

    /// Writes a payload, creating the blob directory on demand.
    pub fn write(&self, bytes: &[u8]) -> BlobResult<BlobRef> {
        let blob = self.describe(bytes);
        let dir = self.blob_dir();
        fs::create_dir_all(&dir).map_err(|source| BlobError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(&blob.file_name);
        if path.exists() {
            debug!(file = %blob.file_name, "blob already present, overwriting");
        }
        fs::write(&path, bytes).map_err(|source| BlobError::Write { path, source })?;
        debug!(
            file = %blob.file_name,
            mime = %blob.mime_type,
            size = blob.size,
            "wrote blob"
        );
        Ok(blob)
    }
}
