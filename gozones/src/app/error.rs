//! Application error types.

use std::fmt;

use crate::layer::RegistryError;
use crate::provider::ProviderError;

/// Errors that can occur while bootstrapping a map session.
#[derive(Debug)]
pub enum AppError {
    /// Failed to build the HTTP client.
    HttpClient(ProviderError),

    /// The layer list could not be registered.
    Registry(RegistryError),

    /// The geocoder chain could not be built.
    Geocoder(ProviderError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::HttpClient(e) => {
                write!(f, "Failed to create HTTP client: {}", e)
            }
            AppError::Registry(e) => {
                write!(f, "Failed to register layers: {}", e)
            }
            AppError::Geocoder(e) => {
                write!(f, "Failed to configure geocoders: {}", e)
            }
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::HttpClient(e) => Some(e),
            AppError::Registry(e) => Some(e),
            AppError::Geocoder(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Registry(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config("missing layers".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing layers"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let registry_err = RegistryError::DuplicateKey("wf30".to_string());
        let app_err: AppError = registry_err.into();
        assert!(matches!(app_err, AppError::Registry(_)));
        assert!(app_err.to_string().contains("wf30"));
    }
}
