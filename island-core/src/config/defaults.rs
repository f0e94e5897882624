//! Default configuration values.
//!
//! These functions are used by `serde`'s `default` attribute in the configuration
//! structures when a value is not specified in `config.toml`.

use crate::config::{IslandConfig, LoggingConfig};
use std::path::PathBuf;

/// Returns the default `LoggingConfig`.
pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Returns the default `IslandConfig`.
pub(crate) fn default_island_config() -> IslandConfig {
    IslandConfig {
        themes_dir: default_themes_dir(),
        active_theme: None,
        notification_throttle_ms: default_notification_throttle_ms(),
        widget_snapshot_throttle_ms: default_widget_snapshot_throttle_ms(),
        widget_interactive_throttle_ms: default_widget_interactive_throttle_ms(),
        navigation_packages: default_navigation_packages(),
    }
}

/// `"info"`
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

/// No log file by default.
pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// `"text"`
pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

/// `None` resolves to `<app data dir>/themes` at load time.
pub(crate) fn default_themes_dir() -> Option<PathBuf> {
    None
}

pub(crate) fn default_notification_throttle_ms() -> u64 {
    300
}

/// Snapshot widgets re-render a whole bitmap, so they get the widest window.
pub(crate) fn default_widget_snapshot_throttle_ms() -> u64 {
    1500
}

pub(crate) fn default_widget_interactive_throttle_ms() -> u64 {
    200
}

/// Package patterns of well-known turn-by-turn navigation apps.
pub(crate) fn default_navigation_packages() -> Vec<String> {
    [
        r"^com\.google\.android\.apps\.maps$",
        r"^com\.waze$",
        r"^com\.huawei\.maps\.app$",
        r"^com\.baidu\.BaiduMap$",
        r"^com\.autonavi\.minimap$",
        r"^com\.tencent\.map$",
        r"^net\.osmand(\.plus)?$",
        r"^com\.sygic\.aura$",
        r"^com\.here\.app\.maps$",
        r"^ru\.yandex\.yandexnavi$",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}
