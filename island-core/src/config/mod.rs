//! Configuration Management for the island pipeline.
//!
//! - [`types`]: schema structs ([`CoreConfig`], [`LoggingConfig`], [`IslandConfig`]).
//! - [`defaults`]: default value functions referenced by `serde(default = ...)`.
//! - [`loader`]: [`ConfigLoader`], which reads `config.toml`, falls back to
//!   defaults when the file is absent, and validates the result.
//!
//! # Examples
//!
//! ```rust,ignore
//! use island_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("notification window: {} ms", config.island.notification_throttle_ms),
//!     Err(e) => {
//!         island_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod types;
pub mod loader;

pub use types::{CoreConfig, LoggingConfig, IslandConfig};
pub use loader::ConfigLoader;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults as config_defaults;

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        let default_log_config = LoggingConfig::default();
        assert_eq!(config.logging.level, default_log_config.level);
        assert_eq!(config.logging.file_path, default_log_config.file_path);
        assert_eq!(config.island, IslandConfig::default());
    }

    #[test]
    fn test_core_config_deserialize_minimal() {
        let toml_data = r#"
            [logging]
            level = "debug"
        "#;
        let config: CoreConfig = toml::from_str(toml_data).expect("Failed to deserialize CoreConfig");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, config_defaults::default_log_format());
        assert_eq!(config.island.notification_throttle_ms, config_defaults::default_notification_throttle_ms());
    }
}
