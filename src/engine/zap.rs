//! ZAP HTTP API transport
//!
//! Concrete [`EngineClient`] over the engine's JSON/OTHER endpoint
//! families: JSON views and actions return an envelope object, OTHER
//! endpoints return raw bytes (HAR payloads, rendered reports).

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{EngineClient, ScanId};
use crate::connection::ProxyConnection;
use crate::error::{Result, ZapscanError};
use crate::har::{HarEntry, HarLog, HarRequest};
use crate::scanner::alerts::Alert;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client for one running engine instance
pub struct ZapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Error envelope the engine returns on rejected API calls
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ScanStarted {
    scan: String,
}

#[derive(Debug, Deserialize)]
struct ScanStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlertList {
    alerts: Vec<Alert>,
}

impl ZapClient {
    /// Build a client for the engine behind `connection`.
    ///
    /// Redirects are never followed at this layer: following happens
    /// engine-side during replay, and API endpoints do not redirect.
    pub fn new(connection: &ProxyConnection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(ZapscanError::Network)?;

        Ok(Self {
            http,
            base_url: connection.base_url(),
            api_key: connection.api_key().to_string(),
        })
    }

    /// Issue one API call and return the raw response bytes
    async fn call(&self, format: &str, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = format!("{}/{}/{}/", self.base_url, format, path);
        tracing::debug!(%url, "Engine API call");

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        if !self.api_key.is_empty() {
            query.push(("apikey", self.api_key.as_str()));
        }
        query.extend_from_slice(params);

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(ZapscanError::Network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ZapscanError::Network)?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiError>(&body) {
                Ok(err) if !err.message.is_empty() => {
                    format!("{} ({})", err.message, err.code)
                }
                _ => format!("HTTP {}", status),
            };
            return Err(ZapscanError::proxy(path, message));
        }

        Ok(body.to_vec())
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.call("JSON", path, params).await?;
        serde_json::from_slice(&body)
            .map_err(|e| ZapscanError::decode(path, e.to_string()))
    }

    async fn call_other(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.call("OTHER", path, params).await
    }
}

#[async_trait]
impl EngineClient for ZapClient {
    async fn get_history(&self) -> Result<Vec<HarEntry>> {
        let body = self.call_other("core/other/messagesHar", &[]).await?;
        let log: HarLog = serde_json::from_slice(&body)
            .map_err(|e| ZapscanError::decode("core/other/messagesHar", e.to_string()))?;
        Ok(log.log.entries)
    }

    async fn clear_history(&self) -> Result<()> {
        // A fresh unnamed session is the engine's history-reset primitive
        self.call(
            "JSON",
            "core/action/newSession",
            &[("name", ""), ("overwrite", "true")],
        )
        .await?;
        Ok(())
    }

    async fn send_request(
        &self,
        request: &HarRequest,
        follow_redirects: bool,
    ) -> Result<Vec<HarEntry>> {
        let serialized = serde_json::to_string(request)
            .map_err(|e| ZapscanError::decode("core/other/sendHarRequest", e.to_string()))?;
        let follow = if follow_redirects { "true" } else { "false" };

        let body = self
            .call_other(
                "core/other/sendHarRequest",
                &[("request", &serialized), ("followRedirects", follow)],
            )
            .await?;

        let log: HarLog = serde_json::from_slice(&body)
            .map_err(|e| ZapscanError::decode("core/other/sendHarRequest", e.to_string()))?;
        Ok(log.log.entries)
    }

    async fn set_passive_scan_enabled(&self, enabled: bool) -> Result<()> {
        let flag = if enabled { "true" } else { "false" };
        self.call("JSON", "pscan/action/setEnabled", &[("enabled", flag)])
            .await?;
        Ok(())
    }

    async fn set_scanners_enabled(&self, rule_ids: &str, enabled: bool) -> Result<()> {
        let path = if enabled {
            "ascan/action/enableScanners"
        } else {
            "ascan/action/disableScanners"
        };
        self.call("JSON", path, &[("ids", rule_ids)]).await?;
        Ok(())
    }

    async fn start_scan(&self, target_url: &str) -> Result<ScanId> {
        let started: ScanStarted = self
            .call_json("ascan/action/scan", &[("url", target_url)])
            .await?;
        let id = started.scan.parse::<u32>().map_err(|_| {
            ZapscanError::decode(
                "ascan/action/scan",
                format!("non-numeric scan id '{}'", started.scan),
            )
        })?;

        tracing::info!(scan_id = id, target = target_url, "Active scan started");
        Ok(ScanId(id))
    }

    async fn scan_status(&self, scan_id: ScanId) -> Result<u8> {
        let id = scan_id.to_string();
        let status: ScanStatus = self
            .call_json("ascan/view/status", &[("scanId", id.as_str())])
            .await?;
        let value = status.status.parse::<u8>().map_err(|_| {
            ZapscanError::decode(
                "ascan/view/status",
                format!("non-numeric status '{}'", status.status),
            )
        })?;
        Ok(value.min(100))
    }

    async fn get_alerts(&self) -> Result<Vec<Alert>> {
        let list: AlertList = self.call_json("core/view/alerts", &[]).await?;
        Ok(list.alerts)
    }

    async fn delete_alerts(&self) -> Result<()> {
        self.call("JSON", "core/action/deleteAllAlerts", &[]).await?;
        Ok(())
    }

    async fn xml_report(&self) -> Result<Vec<u8>> {
        self.call_other("core/other/xmlreport", &[]).await
    }

    async fn html_report(&self) -> Result<Vec<u8>> {
        self.call_other("core/other/htmlreport", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let connection = ProxyConnection::configure("127.0.0.1", 8888, "key").unwrap();
        let client = ZapClient::new(&connection).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8888");
        assert_eq!(client.api_key, "key");
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_network_error() {
        // Reserved TEST-NET-1 address, nothing listens there
        let connection = ProxyConnection::configure("192.0.2.1", 1, "").unwrap();
        let client = ZapClient::new(&connection).unwrap();

        // Short timeout so the test fails fast
        let client = ZapClient {
            http: reqwest::Client::builder()
                .timeout(Duration::from_millis(200))
                .build()
                .unwrap(),
            ..client
        };

        let err = client.get_history().await.unwrap_err();
        assert!(matches!(err, ZapscanError::Network(_)));
    }

    #[test]
    fn test_scan_envelope_decoding() {
        let started: ScanStarted = serde_json::from_str(r#"{"scan": "7"}"#).unwrap();
        assert_eq!(started.scan, "7");

        let status: ScanStatus = serde_json::from_str(r#"{"status": "42"}"#).unwrap();
        assert_eq!(status.status, "42");
    }
}
