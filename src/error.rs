//! Error types for zapscan
//!
//! Every engine-side failure surfaces as exactly one of these kinds;
//! the facade performs no retries and no silent recovery.

use thiserror::Error;

/// Main error type for facade operations
#[derive(Error, Debug)]
pub enum ZapscanError {
    /// Invalid connection parameters supplied by the caller
    #[error("Configuration error: {field} - {reason}")]
    Config { field: &'static str, reason: String },

    /// Transport failure reaching the scan engine
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The engine answered, but rejected the operation
    #[error("Proxy error on {endpoint}: {message}")]
    Proxy { endpoint: String, message: String },

    /// The engine answered with a body the facade cannot interpret
    #[error("Failed to decode engine response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// A named cookie or resource the caller assumed present is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operation requires prior state that does not exist
    #[error("Invalid state: {0}")]
    State(String),
}

impl ZapscanError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        ZapscanError::Config {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn proxy(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ZapscanError::Proxy {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub(crate) fn decode(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ZapscanError::Decode {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ZapscanError>;
