//! Configuration Data Structures.
//!
//! These structs are populated by deserializing `config.toml`. Missing fields
//! take their values from [`super::defaults`], and unknown fields are rejected
//! via `#[serde(deny_unknown_fields)]`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use super::defaults;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use island_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/island.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/island.log")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum log level: "trace", "debug", "info", "warn" or "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the app state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Settings for the event pipeline and the theme store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IslandConfig {
    /// Directory holding one sub-directory per installed theme package.
    /// `None` resolves to `<app data dir>/themes` during validation.
    #[serde(default = "defaults::default_themes_dir")]
    pub themes_dir: Option<PathBuf>,
    /// Theme id to activate at startup.
    #[serde(default)]
    pub active_theme: Option<String>,
    /// Minimum interval between progress-driven updates of one notification.
    #[serde(default = "defaults::default_notification_throttle_ms")]
    pub notification_throttle_ms: u64,
    /// Minimum interval between updates of a snapshot-rendered widget.
    #[serde(default = "defaults::default_widget_snapshot_throttle_ms")]
    pub widget_snapshot_throttle_ms: u64,
    /// Minimum interval between updates of an interactive widget.
    #[serde(default = "defaults::default_widget_interactive_throttle_ms")]
    pub widget_interactive_throttle_ms: u64,
    /// Regex patterns (matched against the package id) of navigation apps.
    #[serde(default = "defaults::default_navigation_packages")]
    pub navigation_packages: Vec<String>,
}

impl Default for IslandConfig {
    fn default() -> Self {
        defaults::default_island_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use island_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [island]
/// notification_throttle_ms = 500
/// "#;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert_eq!(loaded.island.notification_throttle_ms, 500);
/// assert_eq!(loaded.island.widget_snapshot_throttle_ms, 1500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_island_config")]
    pub island: IslandConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            island: defaults::default_island_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default_values() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.file_path, None);
        assert_eq!(config.format, "text");
    }

    #[test]
    fn test_island_config_default_values() {
        let config = IslandConfig::default();
        assert_eq!(config.notification_throttle_ms, 300);
        assert_eq!(config.widget_snapshot_throttle_ms, 1500);
        assert_eq!(config.widget_interactive_throttle_ms, 200);
        assert!(config.themes_dir.is_none());
        assert!(config.active_theme.is_none());
        assert!(config.navigation_packages.iter().any(|p| p.contains("waze")));
    }

    #[test]
    fn test_island_config_deserialize_partial() {
        let toml_str = r#"
            themes_dir = "/data/themes"
            active_theme = "neon"
        "#;
        let config: IslandConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.themes_dir, Some(PathBuf::from("/data/themes")));
        assert_eq!(config.active_theme.as_deref(), Some("neon"));
        assert_eq!(config.notification_throttle_ms, 300);
    }

    #[test]
    fn test_core_config_deserialize_empty() {
        let config: CoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_core_config_deserialize_unknown_field() {
        let result = toml::from_str::<CoreConfig>("unknown_field = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_island_config_deserialize_unknown_field() {
        let result = toml::from_str::<IslandConfig>("throttle = 1");
        assert!(result.is_err());
    }
}
