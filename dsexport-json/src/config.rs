//! Export configuration.

use crate::ExportResult;
use dsexport_blob::{BlobWriter, DEFAULT_BLOB_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one export run.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// dest_dir = "out"
/// pretty = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the JSON and the blob subdirectory are written under.
    pub dest_dir: PathBuf,
    /// Name of the blob subdirectory.
    pub blob_dir_name: String,
    /// Indent JSON output.
    pub pretty: bool,
    /// Write generic binary blobs without a `.bin` extension.
    pub drop_generic_binary_extension: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from("."),
            blob_dir_name: DEFAULT_BLOB_DIR.to_string(),
            pretty: true,
            drop_generic_binary_extension: true,
        }
    }
}

impl ExportConfig {
    /// Creates the default configuration for a destination directory.
    pub fn for_dest(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> ExportResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> ExportResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Blob writer configured for this export.
    #[must_use]
    pub fn blob_writer(&self) -> BlobWriter {
        BlobWriter::new(&self.dest_dir)
            .with_dir_name(self.blob_dir_name.clone())
            .drop_generic_extension(self.drop_generic_binary_extension)
    }
}
