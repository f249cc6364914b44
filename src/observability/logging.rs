//! Structured logging.
//!
//! # Responsibilities
//! - Create the per-run log file under the configured directory
//! - Install the tracing subscriber once, before the first probe
//! - Keep wire traces under their own target so they can be filtered
//!
//! Events go to the log file; only errors reach the terminal so progress
//! output stays readable.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::filter::{LevelFilter, ParseError};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ObservabilityConfig;

/// Target for raw request/response traces.
pub const WIRE_TARGET: &str = "ollama_checker::wire";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory {path}: {source}")]
    Directory { path: PathBuf, source: io::Error },

    #[error("cannot create log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("logging already initialised: {0}")]
    Init(#[from] TryInitError),
}

/// Keeps the log file open for the lifetime of the process and syncs it on drop.
#[derive(Debug)]
pub struct LogGuard {
    path: PathBuf,
    file: File,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let _ = self.file.sync_all();
    }
}

/// Default filter when `RUST_LOG` is not set. Wire traces always reach the
/// log file.
pub fn default_directive(log_level: &str) -> String {
    format!("ollama_checker={},{}=debug", log_level, WIRE_TARGET)
}

/// File name for a run started now, e.g. `20240501-153000.log`.
pub fn log_file_name() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S.log").to_string()
}

/// Initialise the global subscriber writing to `<log_dir>/<timestamp>.log`.
pub fn init_logging(config: &ObservabilityConfig, log_dir: &Path) -> Result<LogGuard, LoggingError> {
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::Directory {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let path = log_dir.join(log_file_name());
    let file_error = |source| LoggingError::File {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(file_error)?;
    let sync_handle = file.try_clone().map_err(file_error)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(&config.log_level))?,
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file));

    let terminal_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(terminal_layer)
        .try_init()?;

    Ok(LogGuard {
        path,
        file: sync_handle,
    })
}
