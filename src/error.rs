//! Error types for the crypto market dashboard

use thiserror::Error;

/// Errors that can occur when reading from a market data source
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider answered with a non-success status
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,
}

impl ProviderError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Maps a reqwest error, keeping timeouts distinct from other transport failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }
}

/// Errors that reach dashboard callers
#[derive(Debug, Error, Clone)]
pub enum DashboardError {
    /// A fetch failed and the failure policy asked for it to be surfaced
    #[error("Failed to load {resource}: {message}")]
    FetchFailed { resource: String, message: String },

    /// A configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Creates a FetchFailed error
    pub fn fetch_failed(resource: &str, err: &ProviderError) -> Self {
        Self::FetchFailed {
            resource: resource.to_string(),
            message: err.to_string(),
        }
    }

    /// Creates an InvalidConfig error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates an Internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
