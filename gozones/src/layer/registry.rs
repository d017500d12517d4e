//! Layer registry: load state and visibility for every zone layer.
//!
//! # Concurrency
//!
//! Loads are issued together and complete in any order. Each completion
//! and each toggle runs as one critical section over the registry state
//! (lock order: registry state, then surface), and no lock is held across
//! an `.await`. Whatever the interleaving, a loaded layer ends up attached
//! iff the last toggle said so, or `start_visible` if it was never toggled.
//!
//! # Toggle before load
//!
//! A toggle on a layer that has not finished loading is remembered as the
//! layer's desired visibility and applied when the load completes.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::geometry::{GeoRegion, GeometryError};
use super::spec::{LayerKey, LayerSpec, SpecError};
use crate::provider::{AsyncHttpClient, ProviderError};
use crate::surface::{MapSurface, Overlay, OverlayId, SharedSurface};

/// Registry configuration and lookup errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Layer '{0}' is configured more than once")]
    DuplicateKey(String),

    #[error("Unknown layer '{0}'")]
    UnknownKey(String),

    #[error(transparent)]
    InvalidSpec(#[from] SpecError),

    #[error("Invalid layer base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Why a layer failed to load.
#[derive(Debug, Error)]
pub enum LayerLoadError {
    #[error("Could not resolve source '{source_path}': {reason}")]
    InvalidSource { source_path: String, reason: String },

    #[error("Fetch failed: {0}")]
    Transport(#[from] ProviderError),

    #[error("Bad layer data: {0}")]
    Parse(#[from] GeometryError),
}

/// Load state of one layer.
#[derive(Debug, Clone)]
enum LayerState {
    Unloaded,
    Loading,
    Loaded(Arc<GeoRegion>),
    Failed(String),
}

/// Runtime record for one layer.
#[derive(Debug)]
struct LayerEntry {
    spec: LayerSpec,
    state: LayerState,
    desired_visible: bool,
    attached: bool,
}

/// Load status as reported to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Loaded { features: usize },
    Failed { reason: String },
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded { .. })
    }
}

/// Point-in-time view of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSnapshot {
    pub key: LayerKey,
    pub title: String,
    pub status: LoadStatus,
    /// What the user last asked for (or `start_visible`).
    pub desired_visible: bool,
    /// Whether the overlay is on the surface right now.
    pub visible: bool,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEffect {
    Attached,
    Detached,
    /// Already in the requested state.
    Unchanged,
    /// Not loaded; recorded for when it is.
    Deferred,
}

/// Summary of a `load_all` pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<LayerKey>,
    pub failed: Vec<(LayerKey, LayerLoadError)>,
}

impl LoadReport {
    pub fn all_loaded(&self) -> bool {
        self.failed.is_empty()
    }
}

struct RegistryState {
    entries: HashMap<LayerKey, LayerEntry>,
    order: Vec<LayerKey>,
}

/// Owns every zone layer of one map session.
///
/// Cloning yields another handle onto the same registry, so load tasks and
/// UI event handlers can each hold one.
pub struct LayerRegistry<S: MapSurface> {
    state: Arc<Mutex<RegistryState>>,
    surface: SharedSurface<S>,
    base_url: Option<Url>,
}

impl<S: MapSurface> Clone for LayerRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            surface: Arc::clone(&self.surface),
            base_url: self.base_url.clone(),
        }
    }
}

impl<S: MapSurface> LayerRegistry<S> {
    /// Creates one unloaded entry per spec, in the given order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateKey`] if two specs share a key, or
    /// [`RegistryError::InvalidSpec`] if a spec fails validation.
    pub fn new(specs: Vec<LayerSpec>, surface: SharedSurface<S>) -> Result<Self, RegistryError> {
        let mut entries = HashMap::with_capacity(specs.len());
        let mut order = Vec::with_capacity(specs.len());

        for spec in specs {
            spec.validate()?;
            if entries.contains_key(&spec.key) {
                return Err(RegistryError::DuplicateKey(spec.key.to_string()));
            }
            order.push(spec.key.clone());
            entries.insert(
                spec.key.clone(),
                LayerEntry {
                    desired_visible: spec.start_visible,
                    spec,
                    state: LayerState::Unloaded,
                    attached: false,
                },
            );
        }

        Ok(Self {
            state: Arc::new(Mutex::new(RegistryState { entries, order })),
            surface,
            base_url: None,
        })
    }

    /// Sets the URL that relative layer sources are resolved against.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, RegistryError> {
        let url = Url::parse(base_url).map_err(|e| RegistryError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Layer keys in configuration order.
    pub fn keys(&self) -> Vec<LayerKey> {
        self.state.lock().order.clone()
    }

    /// Snapshot of one layer.
    pub fn entry(&self, key: &str) -> Option<LayerSnapshot> {
        let state = self.state.lock();
        let key = LayerKey::new(key).ok()?;
        state.entries.get(&key).map(snapshot)
    }

    /// Snapshots of every layer in configuration order.
    pub fn entries(&self) -> Vec<LayerSnapshot> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .filter_map(|key| state.entries.get(key))
            .map(snapshot)
            .collect()
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.entry(key).is_some_and(|e| e.status.is_loaded())
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.entry(key).is_some_and(|e| e.visible)
    }

    /// Fetches every layer that has not been fetched yet.
    ///
    /// All requests are in flight at once and none waits on another. Each
    /// completion applies itself as soon as it arrives; failures leave that
    /// layer unloaded for the rest of the session without touching others.
    pub async fn load_all<C: AsyncHttpClient>(&self, client: &C) -> LoadReport {
        let pending = self.claim_unloaded();
        info!(count = pending.len(), "Loading layers");

        let loads = pending.into_iter().map(|(key, source)| async move {
            let result = self.fetch(client, &source).await;
            let failure = self.complete_load(&key, result);
            (key, failure)
        });

        let mut report = LoadReport::default();
        for (key, failure) in join_all(loads).await {
            match failure {
                None => report.loaded.push(key),
                Some(e) => report.failed.push((key, e)),
            }
        }

        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Layer loading settled"
        );
        report
    }

    /// Runs [`load_all`](Self::load_all) on the tokio runtime.
    pub fn spawn_load_all<C>(&self, client: C) -> tokio::task::JoinHandle<LoadReport>
    where
        C: AsyncHttpClient + 'static,
        S: 'static,
    {
        let registry = self.clone();
        tokio::spawn(async move { registry.load_all(&client).await })
    }

    /// Shows or hides a layer.
    ///
    /// The request is recorded even when the layer is not loaded yet.
    /// Showing an attached layer or hiding a detached one changes nothing.
    pub fn set_visibility(&self, key: &str, visible: bool) -> Result<ToggleEffect, RegistryError> {
        let mut state = self.state.lock();
        let entry = LayerKey::new(key)
            .ok()
            .and_then(|k| state.entries.get_mut(&k))
            .ok_or_else(|| RegistryError::UnknownKey(key.to_string()))?;

        entry.desired_visible = visible;

        let LayerState::Loaded(ref region) = entry.state else {
            debug!(key = key, visible, "Layer not loaded yet, toggle deferred");
            return Ok(ToggleEffect::Deferred);
        };

        let id = OverlayId::Layer(entry.spec.key.clone());
        let effect = match (visible, entry.attached) {
            (true, false) => {
                let overlay = Overlay::Region {
                    region: Arc::clone(region),
                    style: entry.spec.style.clone(),
                };
                self.surface.lock().add_overlay(id, overlay);
                entry.attached = true;
                ToggleEffect::Attached
            }
            (false, true) => {
                self.surface.lock().remove_overlay(&id);
                entry.attached = false;
                ToggleEffect::Detached
            }
            _ => ToggleEffect::Unchanged,
        };

        debug!(key = key, visible, effect = ?effect, "Layer toggled");
        Ok(effect)
    }

    /// Marks every unloaded entry as loading and returns what to fetch.
    fn claim_unloaded(&self) -> Vec<(LayerKey, String)> {
        let mut state = self.state.lock();
        let RegistryState { entries, order } = &mut *state;

        order
            .iter()
            .filter_map(|key| {
                let entry = entries.get_mut(key)?;
                if !matches!(entry.state, LayerState::Unloaded) {
                    return None;
                }
                entry.state = LayerState::Loading;
                Some((key.clone(), entry.spec.source.clone()))
            })
            .collect()
    }

    async fn fetch<C: AsyncHttpClient>(
        &self,
        client: &C,
        source: &str,
    ) -> Result<GeoRegion, LayerLoadError> {
        let url = self.resolve_source(source)?;
        debug!(url = %url, "Fetching layer");
        let body = client.get(&url).await?;
        Ok(GeoRegion::from_slice(&body)?)
    }

    fn resolve_source(&self, source: &str) -> Result<String, LayerLoadError> {
        if let Ok(url) = Url::parse(source) {
            return Ok(url.into());
        }

        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| LayerLoadError::InvalidSource {
                source_path: source.to_string(),
                reason: "relative source and no base URL configured".to_string(),
            })?;

        base.join(source)
            .map(Into::into)
            .map_err(|e| LayerLoadError::InvalidSource {
                source_path: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Applies a finished load. Returns the error back for reporting.
    fn complete_load(
        &self,
        key: &LayerKey,
        result: Result<GeoRegion, LayerLoadError>,
    ) -> Option<LayerLoadError> {
        let mut state = self.state.lock();
        let entry = state.entries.get_mut(key)?;

        match result {
            Ok(region) => {
                let region = Arc::new(region);
                if entry.desired_visible {
                    let overlay = Overlay::Region {
                        region: Arc::clone(&region),
                        style: entry.spec.style.clone(),
                    };
                    self.surface
                        .lock()
                        .add_overlay(OverlayId::Layer(key.clone()), overlay);
                    entry.attached = true;
                }
                info!(
                    key = %key,
                    features = region.feature_count(),
                    visible = entry.attached,
                    "Layer loaded"
                );
                entry.state = LayerState::Loaded(region);
                None
            }
            Err(e) => {
                warn!(key = %key, source = %entry.spec.source, error = %e, "Layer failed to load");
                entry.state = LayerState::Failed(e.to_string());
                Some(e)
            }
        }
    }
}

fn snapshot(entry: &LayerEntry) -> LayerSnapshot {
    let status = match &entry.state {
        LayerState::Unloaded => LoadStatus::Unloaded,
        LayerState::Loading => LoadStatus::Loading,
        LayerState::Loaded(region) => LoadStatus::Loaded {
            features: region.feature_count(),
        },
        LayerState::Failed(reason) => LoadStatus::Failed {
            reason: reason.clone(),
        },
    };

    LayerSnapshot {
        key: entry.spec.key.clone(),
        title: entry.spec.title.clone(),
        status,
        desired_visible: entry.desired_visible,
        visible: entry.attached,
    }
}
