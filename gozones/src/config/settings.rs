//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file (the
//! `[layer.<key>]` sections are collected into [`LayerSettings::specs`]).

use std::path::PathBuf;

use crate::layer::{default_layers, LayerSpec};
use crate::logging::{default_log_dir, DEFAULT_LOG_FILE};
use crate::provider::GeocoderConfig;
use crate::surface::MapViewConfig;

/// Base URL relative layer sources are served from by default.
pub const DEFAULT_LAYERS_BASE_URL: &str = "http://localhost:8000/";

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// `[map]`: initial view and base tiles
    pub map: MapViewConfig,
    /// `[layers]` and `[layer.<key>]`
    pub layers: LayerSettings,
    /// `[geocoder]`
    pub geocoder: GeocoderConfig,
    /// `[logging]`
    pub logging: LoggingSettings,
}

/// Zone layer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    /// Relative layer sources are joined onto this URL.
    pub base_url: String,
    /// Layers in file order.
    pub specs: Vec<LayerSpec>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path.
    pub file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            map: MapViewConfig::default(),
            layers: LayerSettings::default(),
            geocoder: GeocoderConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LAYERS_BASE_URL.to_string(),
            specs: default_layers(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_dir().join(DEFAULT_LOG_FILE),
        }
    }
}
