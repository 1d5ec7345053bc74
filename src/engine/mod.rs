//! Scan engine transport boundary
//!
//! The engine (history, alert store, scanner config, report rendering)
//! is an out-of-process service reached over HTTP. Everything the
//! facade needs from it is captured by [`EngineClient`], so the facade
//! stays transport-agnostic and tests can run against an in-memory
//! implementation.

pub mod zap;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::har::{HarEntry, HarRequest};
use crate::scanner::alerts::Alert;

/// Opaque identifier of one active-scan job, assigned by the engine.
/// The facade stores and forwards it without interpreting the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(pub u32);

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Capability set the facade requires from a scan engine
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// All transactions recorded since the last clear, oldest first.
    /// May include entries whose response has not completed yet.
    async fn get_history(&self) -> Result<Vec<HarEntry>>;

    /// Destructively reset the engine-side history to empty
    async fn clear_history(&self) -> Result<()>;

    /// Resend a request through the engine. One resulting entry per
    /// redirect hop when `follow_redirects` is set, else exactly one.
    async fn send_request(
        &self,
        request: &HarRequest,
        follow_redirects: bool,
    ) -> Result<Vec<HarEntry>>;

    /// Toggle passive inspection of all proxied traffic
    async fn set_passive_scan_enabled(&self, enabled: bool) -> Result<()>;

    /// Toggle active-scan rules by id (comma-separated list)
    async fn set_scanners_enabled(&self, rule_ids: &str, enabled: bool) -> Result<()>;

    /// Start an asynchronous active scan; returns the new job id
    async fn start_scan(&self, target_url: &str) -> Result<ScanId>;

    /// Snapshot of a job's progress, 0-100
    async fn scan_status(&self, scan_id: ScanId) -> Result<u8>;

    /// Findings accumulated since the last delete, engine-native order
    async fn get_alerts(&self) -> Result<Vec<Alert>>;

    /// Clear the alert store; idempotent
    async fn delete_alerts(&self) -> Result<()>;

    /// Current findings rendered as an XML document
    async fn xml_report(&self) -> Result<Vec<u8>>;

    /// Current findings rendered as an HTML document
    async fn html_report(&self) -> Result<Vec<u8>>;
}

// Shared engines: multiple facade handles over one client are supported
#[async_trait]
impl<T: EngineClient + ?Sized> EngineClient for std::sync::Arc<T> {
    async fn get_history(&self) -> Result<Vec<HarEntry>> {
        (**self).get_history().await
    }

    async fn clear_history(&self) -> Result<()> {
        (**self).clear_history().await
    }

    async fn send_request(
        &self,
        request: &HarRequest,
        follow_redirects: bool,
    ) -> Result<Vec<HarEntry>> {
        (**self).send_request(request, follow_redirects).await
    }

    async fn set_passive_scan_enabled(&self, enabled: bool) -> Result<()> {
        (**self).set_passive_scan_enabled(enabled).await
    }

    async fn set_scanners_enabled(&self, rule_ids: &str, enabled: bool) -> Result<()> {
        (**self).set_scanners_enabled(rule_ids, enabled).await
    }

    async fn start_scan(&self, target_url: &str) -> Result<ScanId> {
        (**self).start_scan(target_url).await
    }

    async fn scan_status(&self, scan_id: ScanId) -> Result<u8> {
        (**self).scan_status(scan_id).await
    }

    async fn get_alerts(&self) -> Result<Vec<Alert>> {
        (**self).get_alerts().await
    }

    async fn delete_alerts(&self) -> Result<()> {
        (**self).delete_alerts().await
    }

    async fn xml_report(&self) -> Result<Vec<u8>> {
        (**self).xml_report().await
    }

    async fn html_report(&self) -> Result<Vec<u8>> {
        (**self).html_report().await
    }
}
