//! Configuration Loading.
//!
//! [`ConfigLoader::load`] reads `config.toml` from the application config
//! directory (see [`crate::utils::paths::get_app_config_dir`]). A missing file
//! yields the default configuration; any other read failure or a TOML parse
//! failure is an error. The result is always passed through
//! [`ConfigLoader::validate_config`], which normalises values and resolves
//! relative paths.

use std::fs;
use std::path::Path;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as island_fs;
use crate::utils::paths::{get_app_config_dir, get_app_data_dir, get_app_state_dir};

const CONFIG_FILENAME: &str = "config.toml";
const THEMES_DIRNAME: &str = "themes";

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the `CoreConfig` from the application config directory.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let config_path = get_app_config_dir()?.join(CONFIG_FILENAME);
        Self::load_from_path(&config_path)
    }

    /// Loads and validates the `CoreConfig` from an explicit file.
    ///
    /// A missing file is not an error; defaults are validated and returned.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::load_from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration at {:?}, using defaults", path);
                let mut config = CoreConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Parses and validates configuration from TOML text.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = if content.trim().is_empty() {
            CoreConfig::default()
        } else {
            toml::from_str(content).map_err(ConfigError::ParseError)?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Validates `config` in place.
    ///
    /// - Log level must be one of trace, debug, info, warn, error (normalised to lowercase).
    /// - Log format must be text or json (normalised to lowercase).
    /// - A relative log file path is made absolute against the app state directory,
    ///   and its parent directory is created.
    /// - `themes_dir` defaults to `<app data dir>/themes`; relative values are
    ///   resolved against the app data directory.
    /// - Throttle windows must be non-zero.
    pub fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(log_path) = &config.logging.file_path {
            let absolute_path = if log_path.is_absolute() {
                log_path.clone()
            } else {
                get_app_state_dir()?.join(log_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    island_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        let island = &mut config.island;
        for (name, value) in [
            ("notification_throttle_ms", island.notification_throttle_ms),
            ("widget_snapshot_throttle_ms", island.widget_snapshot_throttle_ms),
            ("widget_interactive_throttle_ms", island.widget_interactive_throttle_ms),
        ] {
            if value == 0 {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "{} must be greater than zero",
                    name
                ))));
            }
        }

        island.themes_dir = Some(match island.themes_dir.take() {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => get_app_data_dir()?.join(dir),
            None => get_app_data_dir()?.join(THEMES_DIRNAME),
        });

        if let Some(active) = &island.active_theme {
            if active.trim().is_empty() {
                island.active_theme = None;
            }
        }

        Ok(())
    }
}
