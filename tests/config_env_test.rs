//! Environment overrides live in their own test binary: env vars are process-global.

use std::fs;

use tempfile::TempDir;

use groc::config::{local_config_path, Settings};
use groc::domain::MergeMode;

#[test]
fn given_groc_env_vars_when_load_then_override_config_files() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(
        local_config_path(temp.path()),
        r#"
storage_key = "fromFile"
[export]
title = "From File"
"#,
    )
    .unwrap();
    std::env::set_var("GROC_STORAGE_KEY", "fromEnv");
    std::env::set_var("GROC_DEFAULT_MODE", "update");
    std::env::set_var("GROC_EXPORT__TITLE", "Weekly Shop");

    // Act
    let settings = Settings::load_from(None, Some(temp.path()));

    std::env::remove_var("GROC_STORAGE_KEY");
    std::env::remove_var("GROC_DEFAULT_MODE");
    std::env::remove_var("GROC_EXPORT__TITLE");

    // Assert
    let settings = settings.expect("load settings");
    assert_eq!(settings.storage_key, "fromEnv");
    assert_eq!(settings.default_mode, MergeMode::Replace);
    assert_eq!(settings.export.title, "Weekly Shop");
}
