//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/groc/groc.toml`
//! 3. Local config: `<dir>/.groc.toml` (directory given by `-C`, default cwd)
//! 4. Environment variables: `GROC_*` prefix (`GROC_EXPORT__TITLE` for nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::MergeMode;

/// Default storage key; matches the key the browser version used.
pub const DEFAULT_STORAGE_KEY: &str = "tableData";

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Title printed at the top of the document
    pub title: String,
    /// File name used when no output path is given
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Grocery List".into(),
            file_name: "grocery-list.pdf".into(),
        }
    }
}

/// Raw export config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub title: Option<String>,
    pub file_name: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub default_mode: Option<MergeMode>,
    #[serde(default)]
    pub export: RawExportConfig,
}

/// Unified configuration for groc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the ledger snapshot (default: XDG data dir)
    pub data_dir: PathBuf,
    /// Key the ledger snapshot is stored under
    pub storage_key: String,
    /// Mode used by `add` when `--mode` is not given
    pub default_mode: MergeMode,
    /// Export settings
    pub export: ExportConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            default_mode: MergeMode::Add,
            export: ExportConfig::default(),
        }
    }
}

/// Default data directory (`$XDG_DATA_HOME/groc`).
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "groc")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/groc"))
}

/// Get the XDG config directory for groc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "groc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("groc.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".groc.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in `data_dir`.
    ///
    /// Unknown variables leave the path as written.
    fn expand_paths(&mut self) {
        let raw = self.data_dir.to_string_lossy().into_owned();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.data_dir = PathBuf::from(expanded.into_owned());
        }
    }

    /// Overlay a config file onto self: specified values win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            storage_key: overlay
                .storage_key
                .clone()
                .unwrap_or_else(|| self.storage_key.clone()),
            default_mode: overlay.default_mode.unwrap_or(self.default_mode),
            export: ExportConfig {
                title: overlay
                    .export
                    .title
                    .clone()
                    .unwrap_or_else(|| self.export.title.clone()),
                file_name: overlay
                    .export
                    .file_name
                    .clone()
                    .unwrap_or_else(|| self.export.file_name.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory whose `.groc.toml` is applied after the global config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/groc/groc.toml`
    /// 3. Local config: `<local_dir>/.groc.toml`
    /// 4. Environment variables: `GROC_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply GROC_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("GROC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("storage_key") {
            settings.storage_key = val;
        }
        if let Ok(val) = config.get_string("default_mode") {
            settings.default_mode = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("GROC_DEFAULT_MODE: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("export.title") {
            settings.export.title = val;
        }
        if let Ok(val) = config.get_string("export.file_name") {
            settings.export.file_name = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.storage_key.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "storage_key must not be empty".into(),
            });
        }
        if self.export.file_name.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "export.file_name must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# groc configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/groc/groc.toml   (your baseline)
#   Local:  <dir>/.groc.toml           (per-directory overrides, dir from -C or cwd)
#   Env:    GROC_* environment variables, e.g. GROC_DATA_DIR, GROC_EXPORT__TITLE

# Directory holding the ledger snapshot
# data_dir = "~/.local/share/groc"

# Key the snapshot is stored under (file: <data_dir>/<storage_key>.json)
# storage_key = "tableData"

# Mode for `groc add` without --mode: "add" or "replace"
# default_mode = "add"

[export]
# Title printed on the exported list
# title = "Grocery List"

# Output file name when --output is not given
# file_name = "grocery-list.pdf"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
