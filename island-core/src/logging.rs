//! Logging setup built on the `tracing` ecosystem.
//!
//! Two entry points:
//! - [`init_minimal_logging`] for tests and early startup (stderr, `RUST_LOG`).
//! - [`init_logging`] driven by [`LoggingConfig`]: a stdout layer plus an
//!   optional daily-rolling file layer, each in text or JSON format.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking file writer alive so buffered lines get flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Initializes a minimal stderr subscriber filtered by `RUST_LOG` (default `info`).
///
/// Errors (e.g. a global subscriber already set) are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, LoggingError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(LoggingError::FilterError(format!("Invalid log level in config: {}", other))),
    }
}

fn create_file_layer(log_path: &Path, format: &str, level: Level) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    utils::fs::ensure_dir_exists(directory)?;

    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("island.log"));
    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::new(level.to_string());

    let layer = match format {
        "json" => fmt::layer()
            .json()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
        _ => fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
    };
    Ok((layer, guard))
}

/// Initializes the global subscriber from a [`LoggingConfig`].
///
/// When `is_reload` is `true`, an already-installed subscriber is not an
/// error; the call is logged and otherwise ignored.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;
    let format = config.format.to_lowercase();

    let stdout_filter = EnvFilter::new(level.to_string());
    let stdout_layer: BoxedLayer = match format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(stdout_filter)
            .boxed(),
        _ => fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(stdout_filter)
            .boxed(),
    };

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer];
    let mut new_file_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &format, level)?;
        layers.push(file_layer);
        new_file_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => *slot = new_file_guard,
        Err(e) => eprintln!("[ERROR] Failed to lock LOG_WORKER_GUARD: {}. Log flushing may be affected.", e),
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            tracing::info!("Logging re-initialisation skipped, subscriber already set: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}
