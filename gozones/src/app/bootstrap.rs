//! Application bootstrap implementation.
//!
//! This module contains `GoZonesApp`, which wires one map surface to a
//! layer registry and a location resolver that share it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::layer::{LayerRegistry, LoadReport};
use crate::provider::{AsyncGeocoderType, AsyncHttpClient, AsyncReqwestClient, GeocoderChain};
use crate::resolver::LocationResolver;
use crate::surface::{shared, HeadlessSurface, SharedSurface};

/// Resolver type used by the application.
pub type AppResolver<C> = LocationResolver<HeadlessSurface, AsyncGeocoderType<C>>;

/// One map session: a surface plus the components that draw on it.
///
/// Components are created in this order:
/// 1. The surface, showing the initial view with the base tiles attached
/// 2. The layer registry (all layers unloaded)
/// 3. The geocoder chain and the location resolver
///
/// Layer loading is not started by construction; call
/// [`load_layers`](Self::load_layers) or
/// [`spawn_layer_loading`](Self::spawn_layer_loading).
///
/// # Example
///
/// ```ignore
/// use gozones::app::{AppConfig, GoZonesApp};
///
/// let app = GoZonesApp::start(AppConfig::default())?;
/// let loading = app.spawn_layer_loading();
///
/// app.registry().set_visibility("wf30", true)?;
/// app.resolver().resolve_address("400 N Tampa St, Tampa, FL").await?;
/// ```
pub struct GoZonesApp<C: AsyncHttpClient + Clone = AsyncReqwestClient> {
    surface: SharedSurface<HeadlessSurface>,
    registry: LayerRegistry<HeadlessSurface>,
    resolver: AppResolver<C>,
    http_client: C,
    config: AppConfig,
}

impl GoZonesApp<AsyncReqwestClient> {
    /// Start a session that talks to the network through reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or any component
    /// rejects its configuration.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        let http_client = AsyncReqwestClient::with_options(
            config.geocoder.http_timeout_secs,
            &config.geocoder.user_agent,
        )
        .map_err(AppError::HttpClient)?;

        Self::with_client(config, http_client)
    }
}

impl<C: AsyncHttpClient + Clone> GoZonesApp<C> {
    /// Start a session over the given HTTP client.
    pub fn with_client(config: AppConfig, http_client: C) -> Result<Self, AppError> {
        let surface = shared(HeadlessSurface::new(&config.map));

        let registry = LayerRegistry::new(config.layers.clone(), Arc::clone(&surface))?
            .with_base_url(&config.layers_base_url)?;

        let chain = GeocoderChain::standard(http_client.clone(), &config.geocoder)
            .map_err(AppError::Geocoder)?;
        let resolver = LocationResolver::new(chain, Arc::clone(&surface));

        info!(
            layers = config.layers.len(),
            base_url = %config.layers_base_url,
            "Map session started"
        );

        Ok(Self {
            surface,
            registry,
            resolver,
            http_client,
            config,
        })
    }

    pub fn surface(&self) -> &SharedSurface<HeadlessSurface> {
        &self.surface
    }

    pub fn registry(&self) -> &LayerRegistry<HeadlessSurface> {
        &self.registry
    }

    pub fn resolver(&self) -> &AppResolver<C> {
        &self.resolver
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load every layer and wait for all of them to settle.
    pub async fn load_layers(&self) -> LoadReport {
        self.registry.load_all(&self.http_client).await
    }
}

impl<C: AsyncHttpClient + Clone + 'static> GoZonesApp<C> {
    /// Load every layer in the background.
    ///
    /// Toggles and lookups can be issued while the returned task runs.
    pub fn spawn_layer_loading(&self) -> JoinHandle<LoadReport> {
        self.registry.spawn_load_all(self.http_client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerSpec, RegistryError, StyleSpec};
    use crate::provider::MockAsyncHttpClient;
    use crate::surface::{MapSurface, OverlayId, DEFAULT_CENTER, DEFAULT_ZOOM};

    const ZONE: &str = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[-82.0,28.0]}}"#;

    #[test]
    fn test_start_shows_initial_view() {
        let app = GoZonesApp::with_client(AppConfig::default(), MockAsyncHttpClient::new()).unwrap();

        let surface = app.surface().lock();
        assert_eq!(surface.view(), (DEFAULT_CENTER, DEFAULT_ZOOM));
        assert!(surface.base_layer().is_some());
        assert!(surface.attached().is_empty());
        drop(surface);

        assert_eq!(app.registry().keys().len(), 7);
    }

    #[test]
    fn test_start_with_reqwest() {
        let app = GoZonesApp::start(AppConfig::default()).unwrap();
        assert_eq!(app.config().layers.len(), 7);
    }

    #[test]
    fn test_duplicate_layers_rejected() {
        let spec = LayerSpec::new("a", "a.geojson", StyleSpec::solid("#fff", 0.1), true).unwrap();
        let config = AppConfig::default().with_layers(vec![spec.clone(), spec]);

        let result = GoZonesApp::with_client(config, MockAsyncHttpClient::new());

        assert!(matches!(
            result,
            Err(AppError::Registry(RegistryError::DuplicateKey(_)))
        ));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let config = AppConfig::default().with_layers_base_url("zones");
        assert!(matches!(
            GoZonesApp::with_client(config, MockAsyncHttpClient::new()),
            Err(AppError::Registry(RegistryError::InvalidBaseUrl { .. }))
        ));
    }

    #[tokio::test]
    async fn test_layers_and_marker_share_the_surface() {
        let client = MockAsyncHttpClient::new().with_body("Publix_15mi", ZONE);
        let app = GoZonesApp::with_client(AppConfig::default(), client).unwrap();

        let report = app.spawn_layer_loading().await.unwrap();
        app.resolver().resolve_coordinates("27.95, -82.46").unwrap();

        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.failed.len(), 6);
        let surface = app.surface().lock();
        assert!(surface.has_overlay(&OverlayId::Marker));
        assert_eq!(surface.attached().len(), 2);
    }
}
