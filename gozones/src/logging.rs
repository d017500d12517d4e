//! Logging infrastructure for Go Zones.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `~/.gozones/logs/gozones.log` (cleared on session start)
//! - Also prints compact lines to stderr, keeping stdout for command output
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "gozones.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file,
/// and sets up output to both the file and stderr.
///
/// # Errors
///
/// Returns error if the log directory cannot be created, the log file
/// cannot be cleared, or a global subscriber is already installed.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    // Defaults to INFO if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates `log_dir` and truncates `log_file` inside it.
pub fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// Default log directory (`~/.gozones/logs`).
pub fn default_log_dir() -> PathBuf {
    crate::config::config_directory().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(default_log_dir().ends_with(".gozones/logs"));
        assert_eq!(DEFAULT_LOG_FILE, "gozones.log");
    }

    #[test]
    fn test_prepare_creates_nested_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let log_dir = temp.path().join("deep/nested/logs");

        let path = prepare_log_file(&log_dir, "test.log").unwrap();

        assert!(log_dir.exists());
        assert_eq!(path, log_dir.join("test.log"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_prepare_clears_existing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let log_path = temp.path().join("test.log");
        fs::write(&log_path, "old log data").unwrap();

        prepare_log_file(temp.path(), "test.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }
}
