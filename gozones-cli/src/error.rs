//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use gozones::app::AppError;
use gozones::config::ConfigFileError;
use gozones::layer::RegistryError;
use gozones::resolver::ResolveError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Failed to start the map session
    Startup(AppError),
    /// A layer toggle was rejected
    Layer(RegistryError),
    /// An address or coordinate lookup failed
    Lookup(ResolveError),
    /// Failed to create the async runtime
    Runtime(std::io::Error),
    /// Reading commands from stdin failed
    Input(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Lookup(ResolveError::NotFound(_)) => {
                eprintln!();
                eprintln!("Tried the US Census geocoder, then OpenStreetMap (Nominatim).");
                eprintln!("Try:");
                eprintln!("  1. Adding the city and state, e.g. \"400 N Tampa St, Tampa, FL\"");
                eprintln!("  2. Plotting coordinates instead: gozones plot \"27.95, -82.46\"");
            }
            CliError::Lookup(ResolveError::InvalidInput(_)) => {
                eprintln!();
                eprintln!("Coordinates are latitude first, e.g. \"28.4, -82.5\".");
            }
            CliError::Layer(RegistryError::UnknownKey(_)) => {
                eprintln!();
                eprintln!("Run 'gozones layers' to list the configured layer keys.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Startup(e) => write!(f, "Failed to start map session: {}", e),
            CliError::Layer(e) => write!(f, "{}", e),
            CliError::Lookup(ResolveError::NotFound(detail)) => {
                write!(f, "Location not found: {}", detail)
            }
            CliError::Lookup(ResolveError::InvalidInput(detail)) => {
                write!(f, "Invalid input: {}", detail)
            }
            CliError::Lookup(e) => write!(f, "Lookup failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to create async runtime: {}", e),
            CliError::Input(e) => write!(f, "Failed to read input: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Startup(e) => Some(e),
            CliError::Layer(e) => Some(e),
            CliError::Lookup(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Startup(e)
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        CliError::Layer(e)
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Lookup(e)
    }
}
