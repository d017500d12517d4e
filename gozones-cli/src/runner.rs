//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, runtime creation
//! and session startup to reduce duplication across command handlers.

use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tracing::info;

use gozones::app::{AppConfig, GoZonesApp};
use gozones::config::ConfigFile;
use gozones::logging::{init_logging, LoggingGuard, DEFAULT_LOG_FILE};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    /// Where the configuration was loaded from
    config_path: PathBuf,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// A missing config file means built-in defaults.
    pub fn new(config_path: &Path) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        let logging_guard = init_logging(&log_dir, &log_file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path: config_path.to_path_buf(),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Go Zones v{}", env!("CARGO_PKG_VERSION"));
        info!(
            config = %self.config_path.display(),
            "Go Zones CLI: {} command",
            command
        );
    }

    /// Create the multi-threaded runtime commands run on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }

    /// Start a map session from the loaded configuration.
    pub fn start_app(&self) -> Result<GoZonesApp, CliError> {
        let config = AppConfig::from_config_file(&self.config);
        let app = GoZonesApp::start(config)?;
        Ok(app)
    }
}
