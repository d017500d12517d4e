//! Ordered geocoder fallback.
//!
//! Providers are asked in order; the first [`GeocodeOutcome::Match`] wins.
//! Misses and errors from earlier providers are logged and skipped. When
//! every provider fails, the failure detail of the **last** one is what
//! the user sees.

use std::time::Duration;

use tracing::{info, warn};

use crate::coord::ResolvedPoint;
use crate::provider::census::{CensusGeocoder, CENSUS_BASE_URL, CENSUS_BENCHMARK};
use crate::provider::http::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::provider::nominatim::{NominatimGeocoder, NOMINATIM_BASE_URL};
use crate::provider::{AsyncHttpClient, GeocodeOutcome, GeocodeProvider, ProviderError};

/// Default per-provider lookup timeout in seconds.
pub const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 10;

/// Settings for the standard two-provider chain.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub census_url: String,
    pub census_benchmark: String,
    pub nominatim_url: String,
    pub user_agent: String,
    /// Upper bound for one provider lookup.
    pub timeout_secs: u64,
    /// Transport-level timeout for the HTTP client.
    pub http_timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            census_url: CENSUS_BASE_URL.to_string(),
            census_benchmark: CENSUS_BENCHMARK.to_string(),
            nominatim_url: NOMINATIM_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_GEOCODE_TIMEOUT_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Enum dispatch over the concrete geocoders.
pub enum AsyncGeocoderType<C: AsyncHttpClient> {
    Census(CensusGeocoder<C>),
    Nominatim(NominatimGeocoder<C>),
}

impl<C: AsyncHttpClient> GeocodeProvider for AsyncGeocoderType<C> {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        match self {
            Self::Census(p) => p.geocode(query).await,
            Self::Nominatim(p) => p.geocode(query).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Census(p) => p.name(),
            Self::Nominatim(p) => p.name(),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Census(p) => p.label(),
            Self::Nominatim(p) => p.label(),
        }
    }
}

/// One provider's answer within a chain lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub provider: String,
    pub outcome: GeocodeOutcome,
}

/// Every provider missed or failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainExhausted {
    /// Detail from the last provider tried.
    pub detail: String,
    pub attempts: Vec<Attempt>,
}

/// Ordered list of geocoders tried in sequence.
pub struct GeocoderChain<P: GeocodeProvider> {
    providers: Vec<P>,
    timeout: Duration,
}

impl<C: AsyncHttpClient + Clone> GeocoderChain<AsyncGeocoderType<C>> {
    /// Builds the Census → Nominatim chain.
    pub fn standard(http_client: C, config: &GeocoderConfig) -> Result<Self, ProviderError> {
        let census = CensusGeocoder::with_endpoint(
            http_client.clone(),
            &config.census_url,
            config.census_benchmark.clone(),
        )?;
        let nominatim = NominatimGeocoder::with_endpoint(
            http_client,
            &config.nominatim_url,
            config.user_agent.clone(),
        )?;

        Ok(Self::new(
            vec![
                AsyncGeocoderType::Census(census),
                AsyncGeocoderType::Nominatim(nominatim),
            ],
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

impl<P: GeocodeProvider> GeocoderChain<P> {
    /// Creates a chain from providers in priority order.
    pub fn new(providers: Vec<P>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Asks each provider in turn until one matches.
    pub async fn lookup(&self, query: &str) -> Result<ResolvedPoint, ChainExhausted> {
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let outcome = match tokio::time::timeout(self.timeout, provider.geocode(query)).await
            {
                Ok(outcome) => outcome,
                Err(_) => GeocodeOutcome::Error(ProviderError::Timeout(self.timeout.as_secs())),
            };

            match outcome {
                GeocodeOutcome::Match(point) => {
                    info!(
                        provider = provider.name(),
                        lat = point.lat,
                        lng = point.lng,
                        "Address resolved"
                    );
                    return Ok(point);
                }
                GeocodeOutcome::Miss(ref detail) => {
                    info!(provider = provider.name(), detail = %detail, "Geocoder miss");
                }
                GeocodeOutcome::Error(ref e) => {
                    warn!(provider = provider.name(), error = %e, "Geocoder failed");
                }
            }

            attempts.push(Attempt {
                provider: provider.name().to_string(),
                outcome,
            });
        }

        let detail = attempts
            .last()
            .and_then(|a| a.outcome.failure_detail())
            .unwrap_or_else(|| "No geocoding providers configured".to_string());

        Err(ChainExhausted { detail, attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    const CENSUS_MATCH: &str = r#"{"result":{"addressMatches":[{"matchedAddress":"1 MAIN ST, TAMPA, FL","coordinates":{"x":-82.45,"y":27.95}}]}}"#;
    const CENSUS_EMPTY: &str = r#"{"result":{"addressMatches":[]}}"#;
    const NOMINATIM_MATCH: &str =
        r#"[{"lat":"28.54","lon":"-81.38","display_name":"Orlando, Florida"}]"#;

    fn chain(client: MockAsyncHttpClient) -> GeocoderChain<AsyncGeocoderType<MockAsyncHttpClient>> {
        GeocoderChain::standard(client, &GeocoderConfig::default()).unwrap()
    }

    #[test]
    fn test_standard_chain_order() {
        let chain = chain(MockAsyncHttpClient::new());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.provider_names(), vec!["Census", "Nominatim"]);
    }

    #[test]
    fn test_standard_chain_rejects_bad_url() {
        let config = GeocoderConfig {
            nominatim_url: "::".to_string(),
            ..GeocoderConfig::default()
        };
        let result = GeocoderChain::standard(MockAsyncHttpClient::new(), &config);
        assert!(matches!(result, Err(ProviderError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_primary_match_short_circuits() {
        let client = MockAsyncHttpClient::new()
            .with_body("geocoding.geo.census.gov", CENSUS_MATCH)
            .with_body("nominatim", NOMINATIM_MATCH);
        let chain = chain(client.clone());

        let point = chain.lookup("1 Main St").await.unwrap();
        assert_eq!(point.provider, "primary");
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_primary_miss_falls_through() {
        let client = MockAsyncHttpClient::new()
            .with_body("geocoding.geo.census.gov", CENSUS_EMPTY)
            .with_body("nominatim", NOMINATIM_MATCH);

        let point = chain(client).lookup("Orlando").await.unwrap();
        assert_eq!(point.provider, "secondary");
    }

    #[tokio::test]
    async fn test_primary_transport_error_falls_through() {
        let client = MockAsyncHttpClient::new()
            .with_error(
                "geocoding.geo.census.gov",
                ProviderError::HttpError("HTTP 502".to_string()),
            )
            .with_body("nominatim", NOMINATIM_MATCH);

        let point = chain(client).lookup("Orlando").await.unwrap();
        assert_eq!(point.provider, "secondary");
    }

    #[tokio::test]
    async fn test_exhaustion_reports_secondary_detail() {
        let client = MockAsyncHttpClient::new()
            .with_error(
                "geocoding.geo.census.gov",
                ProviderError::HttpError("primary down".to_string()),
            )
            .with_error(
                "nominatim",
                ProviderError::HttpError("HTTP 503 from nominatim".to_string()),
            );

        let exhausted = chain(client).lookup("nowhere").await.unwrap_err();
        assert!(exhausted.detail.contains("HTTP 503 from nominatim"));
        assert!(!exhausted.detail.contains("primary down"));
        assert_eq!(exhausted.attempts.len(), 2);
        assert_eq!(exhausted.attempts[0].provider, "Census");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let client = MockAsyncHttpClient::new()
            .with_delayed_body(
                "geocoding.geo.census.gov",
                Duration::from_secs(60),
                CENSUS_MATCH,
            )
            .with_body("nominatim", NOMINATIM_MATCH);

        let point = chain(client).lookup("Orlando").await.unwrap();
        assert_eq!(point.provider, "secondary");
    }

    #[tokio::test]
    async fn test_empty_chain_is_exhausted() {
        let chain: GeocoderChain<AsyncGeocoderType<MockAsyncHttpClient>> =
            GeocoderChain::new(Vec::new(), Duration::from_secs(1));

        let exhausted = chain.lookup("x").await.unwrap_err();
        assert!(exhausted.attempts.is_empty());
        assert!(exhausted.detail.contains("No geocoding providers"));
    }
}
