//! General utilities.
//!
//! - [`fs`]: filesystem helpers returning [`crate::CoreError`] (directory
//!   creation, recursive copy, move-with-fallback).
//! - [`paths`]: XDG-style base and application directories.

pub mod fs;
pub mod paths;

pub use fs::ensure_dir_exists;
