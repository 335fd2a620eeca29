use std::fs;

use bvget_engine::{ensure_output_dir, promote, remove_if_present};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("video");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn removing_a_missing_file_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("BV1_temp_v.mp4");
    assert!(!remove_if_present(&path).unwrap());

    fs::write(&path, "v").unwrap();
    assert!(remove_if_present(&path).unwrap());
    assert!(!path.exists());
}

#[test]
fn promote_replaces_existing_output() {
    let temp = TempDir::new().unwrap();
    let staging = temp.path().join("BV1_temp_out.mp4");
    let output = temp.path().join("BV1.mp4");
    fs::write(&staging, "new").unwrap();
    fs::write(&output, "old").unwrap();

    promote(&staging, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "new");
    assert!(!staging.exists());
}

#[test]
fn promote_without_staging_file_leaves_no_output() {
    let temp = TempDir::new().unwrap();
    let staging = temp.path().join("BV1_temp_out.mp4");
    let output = temp.path().join("BV1.mp4");

    let err = promote(&staging, &output).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    assert!(!output.exists());
}
