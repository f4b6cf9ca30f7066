//! Error types shared across the crate.

use thiserror::Error;

/// Top-level error for configuration, provider setup, and CLI plumbing.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Transport-level failure category reported by the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Connect,
    Timeout,
    Other,
}

/// Failure talking to a model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Non-success HTTP status, with the API's error code and message when present.
    #[error("API error {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Transport error ({kind:?}): {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Provider returned no choices")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() {
            TransportKind::Connect
        } else if err.is_timeout() {
            TransportKind::Timeout
        } else {
            TransportKind::Other
        };
        if err.is_decode() {
            return ProviderError::Decode(err.to_string());
        }
        ProviderError::Transport {
            kind,
            message: err.to_string(),
        }
    }
}
