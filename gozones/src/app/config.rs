//! Application configuration for GoZonesApp.
//!
//! `AppConfig` combines everything needed to bootstrap a map session:
//! the initial view, the layer list and the geocoder settings.

use crate::config::{ConfigFile, DEFAULT_LAYERS_BASE_URL};
use crate::layer::{default_layers, LayerSpec};
use crate::provider::GeocoderConfig;
use crate::surface::MapViewConfig;

/// Application configuration combining all component configs.
///
/// This is the top-level configuration passed to `GoZonesApp::start()`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Initial view and base tiles.
    pub map: MapViewConfig,

    /// Zone layers in display order.
    pub layers: Vec<LayerSpec>,

    /// URL relative layer sources are resolved against.
    pub layers_base_url: String,

    /// Geocoder endpoints and timeouts.
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    /// Builds the application configuration from a loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            map: config.map.clone(),
            layers: config.layers.specs.clone(),
            layers_base_url: config.layers.base_url.clone(),
            geocoder: config.geocoder.clone(),
        }
    }

    /// Replaces the layer list.
    pub fn with_layers(mut self, layers: Vec<LayerSpec>) -> Self {
        self.layers = layers;
        self
    }

    /// Replaces the layer base URL.
    pub fn with_layers_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.layers_base_url = base_url.into();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapViewConfig::default(),
            layers: default_layers(),
            layers_base_url: DEFAULT_LAYERS_BASE_URL.to_string(),
            geocoder: GeocoderConfig::default(),
        }
    }
}
