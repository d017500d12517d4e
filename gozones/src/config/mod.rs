//! User configuration.
//!
//! `~/.gozones/config.ini` holds the initial map view, the zone layer list,
//! geocoder endpoints and the log file location. Missing keys fall back to
//! the built-in Florida deployment.

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LayerSettings, LoggingSettings, DEFAULT_LAYERS_BASE_URL};
