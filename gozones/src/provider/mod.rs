//! Geocoding provider abstraction
//!
//! This module provides traits and implementations for resolving free-text
//! addresses against remote geocoders, plus the HTTP client seam shared with
//! layer loading.
//!
//! # Fallback chain
//!
//! ```ignore
//! use gozones::provider::{AsyncReqwestClient, GeocoderChain, GeocoderConfig};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let chain = GeocoderChain::standard(http_client, &GeocoderConfig::default())?;
//! let point = chain.lookup("400 N Tampa St, Tampa, FL").await;
//! ```

mod census;
mod chain;
mod http;
mod nominatim;
mod types;

pub use census::{CensusGeocoder, CENSUS_BASE_URL, CENSUS_BENCHMARK, PRIMARY_LABEL};
pub use chain::{
    AsyncGeocoderType, Attempt, ChainExhausted, GeocoderChain, GeocoderConfig,
    DEFAULT_GEOCODE_TIMEOUT_SECS,
};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use nominatim::{NominatimGeocoder, NOMINATIM_BASE_URL, SECONDARY_LABEL};
pub use types::{GeocodeOutcome, GeocodeProvider, ProviderError};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
