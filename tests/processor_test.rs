use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use uniquifier::prefix::generate_prefix;
use uniquifier::processor::{Processor, ProcessorBuilder, RenameOutcome, rename_one};

#[test]
fn test_processor_builder_new() {
    // A processor without a target points at its own source
    let processor = ProcessorBuilder::new(Path::new("test_file.txt")).build();

    assert_eq!(processor.source(), &PathBuf::from("test_file.txt"));
    assert_eq!(processor.target(), &PathBuf::from("test_file.txt"));
    assert!(!processor.is_changed());
}

#[test]
fn test_processor_builder_with_target() {
    let processor = Processor::builder(Path::new("test_file.txt"))
        .target(PathBuf::from("renamed.txt"))
        .build();

    assert_eq!(processor.target(), &PathBuf::from("renamed.txt"));
    assert!(processor.is_changed());
}

#[test]
fn test_rename_keeps_content() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("notes.txt");
    let mut file = File::create(&source).expect("Failed to create test file");
    writeln!(file, "keep me").expect("Failed to write test file");

    let prefix = generate_prefix(Some("notes"));
    let outcome = rename_one(&source, &prefix).expect("Rename failed");

    let expected = temp_dir.path().join(format!("{prefix}notes.txt"));
    assert_eq!(
        outcome,
        RenameOutcome::Renamed {
            from: source.clone(),
            to: expected.clone()
        }
    );
    assert!(!source.exists());
    assert_eq!(fs::read_to_string(&expected).unwrap(), "keep me\n");
}

#[test]
fn test_rename_to_same_path_does_nothing() {
    // the source does not even exist: no filesystem call may happen
    let processor = Processor::builder(Path::new("/nowhere/file.txt")).build();

    assert_eq!(processor.perform_rename().unwrap(), RenameOutcome::Unchanged);
}

#[test]
fn test_rename_does_not_overwrite() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("a.txt");
    let existing = temp_dir.path().join("[fixed~]a.txt");
    fs::write(&source, "source").unwrap();
    fs::write(&existing, "existing").unwrap();

    let error = rename_one(&source, "[fixed~]").unwrap_err();

    assert_eq!(error.code(), "AlreadyExists");
    assert_eq!(fs::read_to_string(&existing).unwrap(), "existing");
    assert!(source.exists());
}

#[test]
fn test_rename_of_vanished_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error = rename_one(&temp_dir.path().join("gone.txt"), "[x~]").unwrap_err();

    assert_eq!(error.code(), "NotFound");
}
