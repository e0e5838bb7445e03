//! Property-based tests for content addressing.

use dsexport_blob::BlobWriter;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The same bytes always map to the same file and survive a rewrite.
    #[test]
    fn same_content_same_file(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
        let dir = tempfile::tempdir().unwrap();
        let writer = BlobWriter::new(dir.path());

        let first = writer.write(&bytes).unwrap();
        let second = writer.write(&bytes).unwrap();
        prop_assert_eq!(&first.file_name, &second.file_name);
        prop_assert!(first.file_name.starts_with(&first.digest));

        let on_disk = std::fs::read(writer.blob_dir().join(&first.file_name)).unwrap();
        prop_assert_eq!(on_disk, bytes);
    }
}
