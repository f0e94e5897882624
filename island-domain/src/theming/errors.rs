use std::path::PathBuf;
use thiserror::Error;
use island_core::CoreError;

use super::types::ThemeId;

/// Why a package was rejected as invalid.
#[derive(Debug, Error)]
pub enum InvalidPackageReason {
    #[error("manifest '{0}' not found at package root")]
    MissingManifest(&'static str),

    #[error("manifest could not be parsed: {0}")]
    BadFormat(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ThemeStoreError {
    #[error("Invalid theme package: {0}")]
    InvalidPackage(#[from] InvalidPackageReason),

    #[error("Archive entry '{entry}' escapes the package root")]
    PathTraversal { entry: String },

    #[error("Theme archive could not be read or written: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Theme storage I/O failure: {message} (Path: {path:?})")]
    StorageIo {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Theme storage failure: {0}")]
    Storage(#[from] CoreError),

    #[error("Theme '{theme_id}' not found")]
    ThemeNotFound { theme_id: ThemeId },

    #[error("Theme id '{0}' is not filesystem safe")]
    InvalidThemeId(String),

    #[error("Failed to serialize theme manifest: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Theme store task failed: {0}")]
    TaskFailed(String),
}

impl ThemeStoreError {
    pub(crate) fn storage_io(message: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeStoreError::StorageIo {
            message: message.to_string(),
            path: path.into(),
            source,
        }
    }
}

/// Non-fatal asset lookup failure. Only ever logged; lookups return `None`.
#[derive(Debug, Error)]
pub enum AssetResolutionError {
    #[error("asset reference '{0}' escapes the theme directory")]
    OutsideTheme(String),

    #[error("asset '{reference}' could not be read: {source}")]
    Read {
        reference: String,
        #[source]
        source: std::io::Error,
    },

    #[error("asset '{reference}' is not a decodable image: {source}")]
    Decode {
        reference: String,
        #[source]
        source: image::ImageError,
    },

    #[error("empty asset reference")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_display() {
        assert_eq!(
            format!("{}", ThemeStoreError::from(InvalidPackageReason::MissingManifest("theme_config.json"))),
            "Invalid theme package: manifest 'theme_config.json' not found at package root"
        );
        assert_eq!(
            format!("{}", ThemeStoreError::PathTraversal { entry: "../../escape.txt".to_string() }),
            "Archive entry '../../escape.txt' escapes the package root"
        );
        assert_eq!(
            format!("{}", ThemeStoreError::ThemeNotFound { theme_id: ThemeId::new("neon") }),
            "Theme 'neon' not found"
        );

        let serde_err = serde_json::from_str::<i32>("nope").unwrap_err();
        let serde_msg = serde_err.to_string();
        assert_eq!(
            format!("{}", ThemeStoreError::from(InvalidPackageReason::BadFormat(serde_err))),
            format!("Invalid theme package: manifest could not be parsed: {}", serde_msg)
        );
    }
}
