//! File logging.
//!
//! The terminal is in raw mode on the alternate screen, so logs never go to
//! stdout or stderr. With a log file configured, a `tracing-subscriber` fmt
//! layer appends plain-text lines to it; without one no subscriber is
//! installed and events are discarded.

use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging setup errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be opened.
    #[error("cannot open log file {path}: {source}")]
    Open {
        /// Configured log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the file subscriber if `path` is set.
///
/// `RUST_LOG` takes precedence over `level`. Returns `true` if a subscriber
/// was installed.
pub fn init(path: Option<&Path>, level: &str) -> Result<bool, LoggingError> {
    let Some(path) = path else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open { path: path.to_path_buf(), source })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init()?;

    Ok(true)
}
