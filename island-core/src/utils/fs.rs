//! Filesystem Utilities.
//!
//! Thin wrappers around `std::fs` that map failures to
//! [`CoreError::Filesystem`] with the offending path attached. The directory
//! helpers ([`copy_dir_recursive`], [`move_dir`], [`remove_dir_if_exists`])
//! back the theme store's staging and replace logic.

use crate::error::CoreError;
use std::fs;
use std::io;
use std::path::Path;

fn fs_error(message: &str, path: &Path, source: io::Error) -> CoreError {
    CoreError::Filesystem {
        message: message.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// Fails if `path` exists but is not a directory.
///
/// ```no_run
/// # use island_core::utils::fs::ensure_dir_exists;
/// # use tempfile::tempdir;
/// let temp_dir = tempdir().unwrap();
/// let dir_path = temp_dir.path().join("themes");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(fs_error(
                "Path exists but is not a directory",
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
            ))
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| fs_error("Failed to create directory", path, e))
    }
}

/// Recursively copies the directory tree at `from` into `to`.
///
/// `to` is created if missing. Symlinks are not followed; they are skipped.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> Result<(), CoreError> {
    ensure_dir_exists(to)?;
    let entries = fs::read_dir(from).map_err(|e| fs_error("Failed to read directory", from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| fs_error("Failed to read directory entry", from, e))?;
        let source_path = entry.path();
        let target_path = to.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| fs_error("Failed to stat directory entry", &source_path, e))?;
        if file_type.is_dir() {
            copy_dir_recursive(&source_path, &target_path)?;
        } else if file_type.is_file() {
            fs::copy(&source_path, &target_path)
                .map_err(|e| fs_error("Failed to copy file", &source_path, e))?;
        }
    }
    Ok(())
}

/// Removes the directory tree at `path`. A missing directory is not an error.
pub fn remove_dir_if_exists(path: &Path) -> Result<(), CoreError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(fs_error("Failed to remove directory", path, e)),
    }
}

/// Moves the directory `from` to `to`.
///
/// An atomic `rename` is tried first. When it fails (typically across
/// filesystems) the tree is copied and the source removed. `to` must not exist.
pub fn move_dir(from: &Path, to: &Path) -> Result<(), CoreError> {
    if let Some(parent) = to.parent() {
        ensure_dir_exists(parent)?;
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(
                "rename {:?} -> {:?} failed ({}), falling back to copy",
                from,
                to,
                rename_err
            );
            if let Err(copy_err) = copy_dir_recursive(from, to) {
                let _ = remove_dir_if_exists(to);
                return Err(copy_err);
            }
            remove_dir_if_exists(from)
        }
    }
}
