//! Proxy connection descriptor
//!
//! Holds the network coordinates and API key of the intercepting proxy,
//! and produces the proxy settings a browser or HTTP client needs to
//! route its traffic through it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZapscanError};

/// Connection parameters for a running scan engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConnection {
    /// Engine host (IP or hostname)
    host: String,

    /// Engine listen port
    port: u16,

    /// API key, empty when the engine runs without one
    api_key: String,
}

/// Immutable host/port pair for client proxy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u16,
}

impl ProxyDescriptor {
    /// Render as `host:port`, the form most proxy capabilities accept
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ProxyConnection {
    /// Build a validated connection descriptor
    pub fn configure(host: &str, port: u16, api_key: &str) -> Result<Self> {
        if host.trim().is_empty() {
            return Err(ZapscanError::config("host", "host must not be empty"));
        }
        if port == 0 {
            return Err(ZapscanError::config(
                "port",
                "port must be between 1 and 65535",
            ));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            api_key: api_key.to_string(),
        })
    }

    /// Proxy settings for routing a client through the engine
    pub fn proxy_descriptor(&self) -> ProxyDescriptor {
        ProxyDescriptor {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Base URL of the engine's HTTP API
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
