//! Integration tests for Settings config loading.
//!
//! These tests pass explicit global paths so the user's real config is never read.

use std::fs;

use tempfile::TempDir;

use groc::application::ApplicationError;
use groc::config::{local_config_path, Settings};
use groc::domain::MergeMode;

#[test]
fn given_no_config_files_when_load_then_defaults() {
    let temp = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(temp.path())).expect("load settings");

    assert_eq!(settings.default_mode, MergeMode::Add);
    assert_eq!(settings.export.file_name, "grocery-list.pdf");
}

#[test]
fn given_global_and_local_config_when_load_then_local_wins_per_field() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = temp.path().join("groc.toml");
    fs::write(
        &global,
        r#"
default_mode = "replace"
[export]
file_name = "global.pdf"
"#,
    )
    .unwrap();

    let local_dir = temp.path().join("kitchen");
    fs::create_dir_all(&local_dir).unwrap();
    fs::write(
        local_config_path(&local_dir),
        r#"
[export]
file_name = "kitchen.pdf"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(Some(&global), Some(&local_dir)).expect("load settings");

    // Assert: global value survives where local is silent
    assert_eq!(settings.default_mode, MergeMode::Replace);
    assert_eq!(settings.export.file_name, "kitchen.pdf");
}

#[test]
fn given_data_dir_with_tilde_when_load_then_expanded() {
    let temp = TempDir::new().unwrap();
    fs::write(local_config_path(temp.path()), r#"data_dir = "~/pantry""#).unwrap();

    let settings = Settings::load_from(None, Some(temp.path())).expect("load settings");

    assert!(!settings.data_dir.to_string_lossy().starts_with('~'));
    assert!(settings.data_dir.ends_with("pantry"));
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    fs::write(local_config_path(temp.path()), "default_mode = [").unwrap();

    let err = Settings::load_from(None, Some(temp.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_unknown_mode_in_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    fs::write(local_config_path(temp.path()), r#"default_mode = "subtract""#).unwrap();

    let err = Settings::load_from(None, Some(temp.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_missing_global_path_when_load_then_ignored() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");

    let settings = Settings::load_from(Some(&missing), None).expect("load settings");

    assert_eq!(settings.export.title, "Grocery List");
}
