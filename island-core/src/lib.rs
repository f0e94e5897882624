//! # Island Core Library (`island-core`)
//!
//! `island-core` is the foundation layer of the island theming pipeline. It owns
//! the pieces every other crate leans on but that carry no theming semantics of
//! their own:
//!
//! - **Error Handling**: [`CoreError`] and the more specific [`ConfigError`] and
//!   [`LoggingError`].
//! - **Configuration Management**: [`CoreConfig`] (logging + island pipeline
//!   settings) loaded from TOML by [`ConfigLoader`].
//! - **Logging**: `tracing`-based initialisation with console and optional
//!   rolling-file output, text or JSON.
//! - **Utility Functions**: filesystem helpers (`utils::fs`) used by the theme
//!   store for staging, copying and moving package directories, and path
//!   resolution (`utils::paths`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use island_core::config::ConfigLoader;
//! use island_core::logging::init_logging;
//! use island_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let core_config = ConfigLoader::load()?;
//!     init_logging(&core_config.logging, false)?;
//!     tracing::info!("island core initialized");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod config;
pub mod logging;
pub mod utils;

pub use error::{CoreError, ConfigError, LoggingError};
pub use config::{CoreConfig, LoggingConfig, IslandConfig, ConfigLoader};
pub use logging::{init_logging, init_minimal_logging};
pub use utils::ensure_dir_exists;
