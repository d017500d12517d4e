//! US Census Bureau geocoder (primary provider).
//!
//! Structured government geocoder for US street addresses.
//!
//! # URL Pattern
//!
//! `https://geocoding.geo.census.gov/geocoder/locations/onelineaddress?address={q}&benchmark={b}&format=json`
//!
//! - No authentication required
//! - United States addresses only
//!
//! # Coordinate System
//!
//! Matches carry `coordinates: { x, y }` where **x is longitude and y is
//! latitude**. The flip to `(lat, lng)` happens here and nowhere else.

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::coord::ResolvedPoint;
use crate::provider::{AsyncHttpClient, GeocodeOutcome, GeocodeProvider, ProviderError};

/// Default onelineaddress endpoint.
pub const CENSUS_BASE_URL: &str =
    "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress";

/// Default address benchmark.
pub const CENSUS_BENCHMARK: &str = "Public_AR_Current";

/// Label for points answered by this provider.
pub const PRIMARY_LABEL: &str = "primary";

#[derive(Debug, Deserialize)]
struct CensusResponse {
    result: CensusResult,
}

#[derive(Debug, Deserialize)]
struct CensusResult {
    #[serde(rename = "addressMatches", default)]
    address_matches: Vec<CensusMatch>,
}

#[derive(Debug, Deserialize)]
struct CensusMatch {
    coordinates: CensusCoordinates,
    #[serde(rename = "matchedAddress", default)]
    matched_address: String,
}

#[derive(Debug, Deserialize)]
struct CensusCoordinates {
    x: f64,
    y: f64,
}

/// US Census onelineaddress geocoder.
pub struct CensusGeocoder<C: AsyncHttpClient> {
    http_client: C,
    base_url: Url,
    benchmark: String,
}

impl<C: AsyncHttpClient> CensusGeocoder<C> {
    /// Creates a geocoder against the public endpoint.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            base_url: Url::parse(CENSUS_BASE_URL).expect("CENSUS_BASE_URL is a valid URL"),
            benchmark: CENSUS_BENCHMARK.to_string(),
        }
    }

    /// Creates a geocoder against a custom endpoint and benchmark.
    pub fn with_endpoint(
        http_client: C,
        base_url: &str,
        benchmark: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            http_client,
            base_url,
            benchmark: benchmark.into(),
        })
    }

    /// Builds the request URL for a query.
    fn build_url(&self, query: &str) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("address", query)
            .append_pair("benchmark", &self.benchmark)
            .append_pair("format", "json");
        url.into()
    }
}

/// Decodes a Census response body into an outcome.
fn parse_response(body: &[u8]) -> GeocodeOutcome {
    let response: CensusResponse = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            return GeocodeOutcome::Error(ProviderError::InvalidResponse(format!(
                "Census response: {}",
                e
            )))
        }
    };

    let Some(first) = response.result.address_matches.into_iter().next() else {
        return GeocodeOutcome::Miss("Census geocoder found no matching address".to_string());
    };

    // x = longitude, y = latitude
    let (lat, lng) = (first.coordinates.y, first.coordinates.x);
    match ResolvedPoint::new(lat, lng, first.matched_address, PRIMARY_LABEL) {
        Ok(point) => GeocodeOutcome::Match(point),
        Err(e) => GeocodeOutcome::Error(ProviderError::InvalidResponse(e.to_string())),
    }
}

impl<C: AsyncHttpClient> GeocodeProvider for CensusGeocoder<C> {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        let url = self.build_url(query);
        debug!(provider = "census", url = %url, "Geocoding address");

        match self.http_client.get(&url).await {
            Ok(body) => parse_response(&body),
            Err(e) => GeocodeOutcome::Error(e),
        }
    }

    fn name(&self) -> &str {
        "Census"
    }

    fn label(&self) -> &str {
        PRIMARY_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    const ONE_MATCH: &str = r#"{
        "result": {
            "input": {"address": {"address": "1 Main St"}},
            "addressMatches": [
                {
                    "matchedAddress": "1 MAIN ST, TAMPA, FL, 33602",
                    "coordinates": {"x": -82.4572, "y": 27.9506}
                },
                {
                    "matchedAddress": "1 MAIN ST, OTHER, FL",
                    "coordinates": {"x": -80.0, "y": 26.0}
                }
            ]
        }
    }"#;

    const NO_MATCH: &str = r#"{"result": {"addressMatches": []}}"#;

    #[test]
    fn test_url_construction() {
        let provider = CensusGeocoder::new(MockAsyncHttpClient::new());

        let url = provider.build_url("1 Main St, Tampa FL");
        assert_eq!(
            url,
            "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress\
             ?address=1+Main+St%2C+Tampa+FL&benchmark=Public_AR_Current&format=json"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = CensusGeocoder::with_endpoint(MockAsyncHttpClient::new(), "not a url", "b");
        assert!(matches!(result, Err(ProviderError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_first_match_flips_axes() {
        let client = MockAsyncHttpClient::new().with_body("onelineaddress", ONE_MATCH);
        let provider = CensusGeocoder::new(client);

        match provider.geocode("1 Main St").await {
            GeocodeOutcome::Match(point) => {
                assert_eq!(point.lat, 27.9506);
                assert_eq!(point.lng, -82.4572);
                assert_eq!(point.label, "1 MAIN ST, TAMPA, FL, 33602");
                assert_eq!(point.provider, "primary");
            }
            other => panic!("Expected match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_match_list_is_miss() {
        let client = MockAsyncHttpClient::new().with_body("onelineaddress", NO_MATCH);
        let provider = CensusGeocoder::new(client);

        assert!(matches!(
            provider.geocode("nowhere").await,
            GeocodeOutcome::Miss(_)
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let client = MockAsyncHttpClient::new().with_body("onelineaddress", "<html>");
        let provider = CensusGeocoder::new(client);

        assert!(matches!(
            provider.geocode("x").await,
            GeocodeOutcome::Error(ProviderError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let client = MockAsyncHttpClient::new().with_error(
            "onelineaddress",
            ProviderError::HttpError("Connection refused".to_string()),
        );
        let provider = CensusGeocoder::new(client);

        match provider.geocode("x").await {
            GeocodeOutcome::Error(ProviderError::HttpError(msg)) => {
                assert!(msg.contains("Connection refused"))
            }
            other => panic!("Expected HttpError, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_match_is_error() {
        let body = r#"{"result":{"addressMatches":[{"matchedAddress":"X","coordinates":{"x":10.0,"y":95.0}}]}}"#;
        assert!(matches!(
            parse_response(body.as_bytes()),
            GeocodeOutcome::Error(ProviderError::InvalidResponse(_))
        ));
    }
}
