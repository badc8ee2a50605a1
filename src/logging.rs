use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "notepad.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file `{}`: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid log level `{level}`: {message}")]
    InvalidLevel { level: String, message: String },
    #[error("Failed to install logger: {0}")]
    Install(String),
}

/// Install the global tracing subscriber, writing to `<dir>/notepad.log`.
///
/// stdout belongs to the TUI, so nothing is written to the terminal.
/// `RUST_LOG` wins over `level` when set. Returns the log file path.
pub fn init_logging(level: &str, dir: &Path) -> Result<PathBuf, LoggingError> {
    let path = dir.join(LOG_FILE_NAME);
    let file = open_log_file(dir, &path).map_err(|source| LoggingError::LogFile {
        path: path.clone(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::InvalidLevel {
            level: level.to_string(),
            message: e.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(path)
}

fn open_log_file(dir: &Path, path: &Path) -> std::io::Result<fs::File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new().create(true).append(true).open(path)
}
