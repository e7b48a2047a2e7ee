//! Tests for error types

use wandb_logger::Error;

#[test]
fn test_dependency_missing_error() {
    let error = Error::dependency_missing("wandb");
    let error_str = format!("{error}");
    assert!(error_str.contains("`wandb` logger which is not available"));
    assert!(error_str.contains("Enable the `wandb` feature"));
}

#[test]
fn test_run_exists_error() {
    let error = Error::RunExists("abc".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Run already exists: abc"));
    assert!(error_str.contains("resume"));
}

#[test]
fn test_run_not_found_error() {
    let error = Error::RunNotFound("abc".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Run not found: abc"));
}

#[test]
fn test_invalid_run_id_error() {
    let error = Error::InvalidRunId("sweep/7".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid run id: \"sweep/7\""));
    assert!(error_str.contains("path separators"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").starts_with("JSON error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    let error_str = format!("{error}");
    assert_eq!(error_str, "custom error message");
}

#[test]
fn test_error_debug() {
    let error = Error::dependency_missing("file");
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("DependencyMissing"));
}
