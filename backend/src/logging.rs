//! Structured logging bootstrap.
//!
//! Installs one global `tracing` subscriber with two JSON layers: stdout for
//! the console and a non-blocking file writer at the configured path.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::settings::LogSettings;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file path has no file name component.
    #[error("log file path {path} does not name a file")]
    InvalidPath { path: PathBuf },
    /// The log directory could not be created.
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {message}")]
    Install { message: String },
}

/// Flushes buffered file output when dropped; hold it until exit.
#[must_use = "dropping the guard stops the file writer"]
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the log directory cannot be prepared or a
/// subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<LogGuard, LoggingError> {
    let (file_writer, guard) = file_writer(&settings.file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_string()));
    let console_layer = fmt::layer().json().with_target(true);
    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| LoggingError::Install {
            message: err.to_string(),
        })?;

    Ok(LogGuard { _file: guard })
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let Some(file_name) = path.file_name() else {
        return Err(LoggingError::InvalidPath {
            path: path.to_path_buf(),
        });
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write as _;

    #[rstest]
    fn file_writer_creates_missing_directories() {
        let root = tempfile::tempdir().expect("temp dir");
        let path = root.path().join("nested").join("logs").join("api.log");

        let (mut writer, guard) = file_writer(&path).expect("writer builds");
        writer.write_all(b"{}\n").expect("write accepted");
        drop(guard);

        assert!(path.exists());
    }

    #[rstest]
    fn directory_like_path_is_rejected() {
        let err = file_writer(Path::new("/")).expect_err("no file name");

        assert!(matches!(err, LoggingError::InvalidPath { .. }));
    }
}
