//! Scanning proxy facade
//!
//! [`ProxyScanner`] is the single handle a caller drives: it exposes
//! the engine's traffic history, request replay, scan orchestration,
//! alert store and report rendering behind one API, generic over the
//! transport so tests run against an in-memory engine.

pub mod alerts;
pub mod history;
pub mod orchestrator;
pub mod replay;
pub mod report;

use std::collections::HashMap;
use std::time::Duration;

use crate::connection::ProxyConnection;
use crate::engine::zap::ZapClient;
use crate::engine::{EngineClient, ScanId};
use crate::error::{Result, ZapscanError};
use crate::har::{HarEntry, HarRequest};

use alerts::Alert;
use orchestrator::ScanTracker;

/// Facade over one scan engine instance.
///
/// Engine-side state (history, alerts, scanner config) is shared: two
/// facades pointed at the same engine observe a consistent view, and
/// destructive calls (`clear`, `delete_alerts`) affect all observers
/// immediately. The only caller-side state is the most recently
/// started scan id and the per-scan progress watermark.
pub struct ProxyScanner<C: EngineClient> {
    engine: C,
    tracker: ScanTracker,
}

impl ProxyScanner<ZapClient> {
    /// Connect to the engine described by `connection`
    pub fn connect(connection: &ProxyConnection) -> Result<Self> {
        Ok(Self::with_engine(ZapClient::new(connection)?))
    }
}

impl<C: EngineClient> ProxyScanner<C> {
    /// Wrap an existing engine client (tests, alternative transports)
    pub fn with_engine(engine: C) -> Self {
        Self {
            engine,
            tracker: ScanTracker::new(),
        }
    }

    // --- Traffic history -------------------------------------------------

    /// Snapshot of all completed transactions since the last clear,
    /// in chronological order
    pub async fn history(&self) -> Result<Vec<HarEntry>> {
        history::snapshot(&self.engine).await
    }

    /// Empty the engine-side history
    pub async fn clear(&self) -> Result<()> {
        history::clear(&self.engine).await
    }

    // --- Replay ----------------------------------------------------------

    /// Resend a captured request through the engine; see
    /// [`HarRequest::with_cookie_value`] for the mutation helper
    pub async fn make_request(
        &self,
        request: &HarRequest,
        follow_redirects: bool,
    ) -> Result<Vec<HarEntry>> {
        replay::make_request(&self.engine, request, follow_redirects).await
    }

    // --- Scan orchestration ----------------------------------------------

    /// Toggle passive inspection of all subsequent proxied traffic.
    /// Global and immediate, never retroactive.
    pub async fn set_enable_passive_scan(&self, enabled: bool) -> Result<()> {
        self.engine.set_passive_scan_enabled(enabled).await
    }

    /// Enable or disable active-scan rules by id; ids not listed keep
    /// the engine's default
    pub async fn set_enable_scanners(&self, rule_ids: &[&str], enabled: bool) -> Result<()> {
        self.engine
            .set_scanners_enabled(&rule_ids.join(","), enabled)
            .await
    }

    /// Start an asynchronous active scan against `target_url` with the
    /// currently enabled rule set. The engine assigns a fresh job id,
    /// retrievable via [`last_scan_id`](Self::last_scan_id).
    pub async fn scan(&self, target_url: &str) -> Result<()> {
        url::Url::parse(target_url).map_err(|e| {
            ZapscanError::config("target_url", format!("'{}': {}", target_url, e))
        })?;

        let scan_id = self.engine.start_scan(target_url).await?;
        self.tracker.record(scan_id);
        Ok(())
    }

    /// Id of the most recently started scan; `State` error when no
    /// scan has been started in this session
    pub fn last_scan_id(&self) -> Result<ScanId> {
        self.tracker.last_scan_id()
    }

    /// Progress snapshot for one job, 0-100, monotonic non-decreasing
    /// across calls for a given id
    pub async fn scan_progress(&self, scan_id: ScanId) -> Result<u8> {
        let status = self.engine.scan_status(scan_id).await?;
        Ok(self.tracker.observe(scan_id, status))
    }

    /// Poll until the job completes, sleeping `poll_interval` between
    /// polls; optional `max_wait` bounds the total wait
    pub async fn wait_for_scan(
        &self,
        scan_id: ScanId,
        poll_interval: Duration,
        max_wait: Option<Duration>,
    ) -> Result<()> {
        orchestrator::wait_for_scan(&self.engine, &self.tracker, scan_id, poll_interval, max_wait)
            .await
    }

    // --- Alerts ----------------------------------------------------------

    /// Findings accumulated since the last delete, engine-native order
    pub async fn alerts(&self) -> Result<Vec<Alert>> {
        self.engine.get_alerts().await
    }

    /// Clear the alert store; idempotent, leaves history and scan jobs
    /// untouched
    pub async fn delete_alerts(&self) -> Result<()> {
        self.engine.delete_alerts().await
    }

    /// Group alerts by URL host, skipping malformed URLs
    pub fn group_alerts_by_host(alerts: &[Alert]) -> HashMap<String, Vec<Alert>> {
        alerts::group_by_host(alerts)
    }

    // --- Reports ---------------------------------------------------------

    /// Current findings rendered as an XML document
    pub async fn xml_report(&self) -> Result<Vec<u8>> {
        report::xml(&self.engine).await
    }

    /// Current findings rendered as an HTML document
    pub async fn html_report(&self) -> Result<Vec<u8>> {
        report::html(&self.engine).await
    }
}
