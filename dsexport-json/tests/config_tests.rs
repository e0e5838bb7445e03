use dsexport_json::{ExportConfig, ExportError};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

// ── Defaults ──────────────────────────────────────────────────────

#[test]
fn defaults() {
    let config = ExportConfig::default();
    assert_eq!(config.dest_dir, PathBuf::from("."));
    assert_eq!(config.blob_dir_name, "blob");
    assert!(config.pretty);
    assert!(config.drop_generic_binary_extension);
}

#[test]
fn empty_document_is_default() {
    assert_eq!(ExportConfig::from_toml_str("").unwrap(), ExportConfig::default());
}

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn partial_document_keeps_other_defaults() {
    let config = ExportConfig::from_toml_str("dest_dir = \"out\"\npretty = false\n").unwrap();
    assert_eq!(config.dest_dir, PathBuf::from("out"));
    assert!(!config.pretty);
    assert_eq!(config.blob_dir_name, "blob");
}

#[test]
fn invalid_document_is_config_error() {
    let err = ExportConfig::from_toml_str("pretty = \"yes\"").unwrap_err();
    assert!(matches!(err, ExportError::Config(_)));
}

#[test]
fn load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.toml");
    std::fs::write(&path, "blob_dir_name = \"files\"\ndrop_generic_binary_extension = false\n").unwrap();

    let config = ExportConfig::load(&path).unwrap();
    assert_eq!(config.blob_dir_name, "files");
    assert!(!config.drop_generic_binary_extension);
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ExportConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}
