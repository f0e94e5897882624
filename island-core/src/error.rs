//! Error handling for the island core layer.
//!
//! The main error type for this crate is [`CoreError`], which wraps the more
//! specific [`ConfigError`] and [`LoggingError`]. Domain crates wrap
//! `CoreError` in their own error enums rather than re-declaring filesystem or
//! configuration failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the island pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while initialising the logging system.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(#[from] LoggingError),

    /// Filesystem operations (creating directories, reading, copying, moving)
    /// with the path that was involved.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CoreError {
    /// Returns `true` when the underlying I/O error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Filesystem { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Error type for configuration-related operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::CoreConfig`].
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration values after successful parsing.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (config/data home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Setting the global subscriber failed, usually because one is already set.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// Failed to set or parse a log filter.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_core_error_config_variant() {
        let core_err = CoreError::Config(ConfigError::ValidationError("Test validation".to_string()));

        assert_eq!(
            format!("{}", core_err),
            "Configuration Error: Configuration validation failed: Test validation"
        );
        match core_err.source().and_then(|s| s.downcast_ref::<ConfigError>()) {
            Some(ConfigError::ValidationError(msg)) => assert_eq!(msg, "Test validation"),
            _ => panic!("Incorrect source for CoreError::Config"),
        }
    }

    #[test]
    fn test_core_error_filesystem_variant() {
        let core_err = CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: PathBuf::from("/tmp/themes"),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            format!("{}", core_err),
            "Filesystem Error: Failed to create directory (Path: \"/tmp/themes\")"
        );
        assert!(core_err.source().is_some());
        assert!(!core_err.is_not_found());
    }

    #[test]
    fn test_is_not_found() {
        let fs_err = CoreError::Filesystem {
            message: "read".to_string(),
            path: PathBuf::from("x"),
            source: IoError::new(ErrorKind::NotFound, "gone"),
        };
        assert!(fs_err.is_not_found());
        assert!(!CoreError::Config(ConfigError::ValidationError("x".to_string())).is_not_found());
    }

    #[test]
    fn test_logging_error_wraps_into_core_error() {
        let core_err: CoreError = LoggingError::FilterError("bad".to_string()).into();
        assert_eq!(
            format!("{}", core_err),
            "Logging Initialization Failed: Failed to set log filter: bad"
        );
    }

    #[test]
    fn test_config_error_directory_unavailable() {
        let err = ConfigError::DirectoryUnavailable { dir_type: "Data Base".to_string() };
        assert_eq!(format!("{}", err), "Could not determine base directory for Data Base");
    }
}
