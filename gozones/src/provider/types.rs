//! Provider types and traits

use std::future::Future;

use thiserror::Error;

use crate::coord::ResolvedPoint;

/// Errors that can occur while talking to a remote data source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// No answer within the allotted time
    #[error("Timed out after {0}s")]
    Timeout(u64),
    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// A configured endpoint is not a usable URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result of asking one geocoder about one query.
///
/// A `Miss` means the provider answered but found nothing; an `Error`
/// means it could not answer at all. Both let the chain move on.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Match(ResolvedPoint),
    Miss(String),
    Error(ProviderError),
}

impl GeocodeOutcome {
    /// Human-readable failure detail, `None` for a match.
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            GeocodeOutcome::Match(_) => None,
            GeocodeOutcome::Miss(detail) => Some(detail.clone()),
            GeocodeOutcome::Error(e) => Some(e.to_string()),
        }
    }
}

/// Async trait for address geocoders.
///
/// Implementors turn a normalized free-text address into at most one point.
pub trait GeocodeProvider: Send + Sync {
    /// Looks up an address.
    fn geocode(&self, query: &str) -> impl Future<Output = GeocodeOutcome> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the label written into [`ResolvedPoint::provider`].
    fn label(&self) -> &str;
}
