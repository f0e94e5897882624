//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Backed by `directories-next`. All functions return
//! [`CoreError::Config(ConfigError::DirectoryUnavailable)`] when the directory
//! cannot be determined (e.g. no HOME).

use crate::error::{ConfigError, CoreError};
use directories_next::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Island";
const APPLICATION: &str = "IslandTheming";

fn project_dirs(dir_type: &str) -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: dir_type.to_string(),
        })
    })
}

/// Application config directory, e.g. `~/.config/IslandTheming`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Config").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Application data directory, e.g. `~/.local/share/IslandTheming`.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Data").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Application state directory, used for relative log file paths.
///
/// `directories-next` has no state dir, so this is the local data directory,
/// e.g. `~/.local/share/IslandTheming` on Linux.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App State").map(|dirs| dirs.data_local_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_is_local_data_dir() {
        // No HOME in the environment means no project dirs at all.
        let Some(dirs) = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION) else {
            assert!(get_app_state_dir().is_err());
            return;
        };
        assert_eq!(get_app_state_dir().unwrap(), dirs.data_local_dir());
        assert_eq!(get_app_data_dir().unwrap(), dirs.data_dir());
        assert_eq!(get_app_config_dir().unwrap(), dirs.config_dir());
    }
}
