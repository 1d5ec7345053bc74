//! In-memory engine used by the test suite
//!
//! Implements [`EngineClient`] with scriptable behavior: canned replay
//! responses, per-scan progress sequences and a fixed alert batch per
//! started scan. No network, no real time.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{EngineClient, ScanId};
use crate::error::{Result, ZapscanError};
use crate::har::{HarContent, HarEntry, HarRequest, HarResponse};
use crate::scanner::alerts::Alert;

pub(crate) const XML_REPORT: &[u8] =
    b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<scanreport version=\"1\"></scanreport>";
pub(crate) const HTML_REPORT: &[u8] = b"\n<html><body><h1>Scan report</h1></body></html>\n";

#[derive(Default)]
pub(crate) struct MockEngine {
    history: Mutex<Vec<HarEntry>>,
    replay_queue: Mutex<VecDeque<Vec<HarEntry>>>,
    passive_enabled: Mutex<bool>,
    rules: Mutex<HashMap<String, bool>>,
    progress_scripts: Mutex<HashMap<u32, VecDeque<u8>>>,
    next_script: Mutex<Vec<u8>>,
    next_scan_id: Mutex<u32>,
    alerts: Mutex<Vec<Alert>>,
    alerts_per_scan: Mutex<Vec<Alert>>,
    unreachable: AtomicBool,
}

impl MockEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_history(&self, entry: HarEntry) {
        self.history.lock().push(entry);
    }

    /// Queue the entries the next `send_request` call will return
    pub(crate) fn queue_replay(&self, entries: Vec<HarEntry>) {
        self.replay_queue.lock().push_back(entries);
    }

    /// Progress values the next started scan will report, in order.
    /// The last value repeats once the script is exhausted.
    pub(crate) fn script_next_scan(&self, progress: Vec<u8>) {
        *self.next_script.lock() = progress;
    }

    /// Alerts appended to the store every time a scan starts
    pub(crate) fn set_alerts_per_scan(&self, alerts: Vec<Alert>) {
        *self.alerts_per_scan.lock() = alerts;
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub(crate) fn passive_enabled(&self) -> bool {
        *self.passive_enabled.lock()
    }

    pub(crate) fn rule_enabled(&self, id: &str) -> Option<bool> {
        self.rules.lock().get(id).copied()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ZapscanError::proxy("mock", "engine unreachable"));
        }
        Ok(())
    }
}

/// Build a completed transaction with a text body
pub(crate) fn entry(method: &str, url: &str, status: u16, body: &str) -> HarEntry {
    entry_from(HarRequest::new(method, url), status, body)
}

/// Build a completed transaction around an existing request
pub(crate) fn entry_from(request: HarRequest, status: u16, body: &str) -> HarEntry {
    HarEntry {
        started_date_time: None,
        time: 1.0,
        request,
        response: HarResponse {
            status,
            status_text: String::new(),
            http_version: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
            content: HarContent {
                size: body.len() as i64,
                mime_type: "text/html".to_string(),
                text: Some(body.to_string()),
                encoding: None,
            },
            redirect_url: String::new(),
            headers_size: -1,
            body_size: body.len() as i64,
        },
    }
}

#[async_trait]
impl EngineClient for MockEngine {
    async fn get_history(&self) -> Result<Vec<HarEntry>> {
        self.check_reachable()?;
        Ok(self.history.lock().clone())
    }

    async fn clear_history(&self) -> Result<()> {
        self.check_reachable()?;
        self.history.lock().clear();
        Ok(())
    }

    async fn send_request(
        &self,
        request: &HarRequest,
        follow_redirects: bool,
    ) -> Result<Vec<HarEntry>> {
        self.check_reachable()?;

        let mut entries = match self.replay_queue.lock().pop_front() {
            Some(canned) => canned,
            None => vec![entry_from(request.clone(), 200, "ok")],
        };

        // The first hop always carries the caller's request verbatim
        if let Some(first) = entries.first_mut() {
            first.request = request.clone();
        }
        if !follow_redirects {
            entries.truncate(1);
        }

        // Replayed traffic passes through the proxy, so it is recorded
        self.history.lock().extend(entries.iter().cloned());
        Ok(entries)
    }

    async fn set_passive_scan_enabled(&self, enabled: bool) -> Result<()> {
        self.check_reachable()?;
        *self.passive_enabled.lock() = enabled;
        Ok(())
    }

    async fn set_scanners_enabled(&self, rule_ids: &str, enabled: bool) -> Result<()> {
        self.check_reachable()?;
        let mut rules = self.rules.lock();
        for id in rule_ids.split(',').filter(|s| !s.is_empty()) {
            rules.insert(id.to_string(), enabled);
        }
        Ok(())
    }

    async fn start_scan(&self, _target_url: &str) -> Result<ScanId> {
        self.check_reachable()?;

        let mut next = self.next_scan_id.lock();
        *next += 1;
        let id = *next;

        let script = self.next_script.lock().clone();
        let script = if script.is_empty() { vec![100] } else { script };
        self.progress_scripts.lock().insert(id, script.into());

        self.alerts
            .lock()
            .extend(self.alerts_per_scan.lock().iter().cloned());

        Ok(ScanId(id))
    }

    async fn scan_status(&self, scan_id: ScanId) -> Result<u8> {
        self.check_reachable()?;
        let mut scripts = self.progress_scripts.lock();
        let script = scripts
            .get_mut(&scan_id.0)
            .ok_or_else(|| ZapscanError::proxy("mock", format!("no scan {}", scan_id)))?;

        if script.len() > 1 {
            Ok(script.pop_front().unwrap())
        } else {
            Ok(*script.front().unwrap_or(&100))
        }
    }

    async fn get_alerts(&self) -> Result<Vec<Alert>> {
        self.check_reachable()?;
        Ok(self.alerts.lock().clone())
    }

    async fn delete_alerts(&self) -> Result<()> {
        self.check_reachable()?;
        self.alerts.lock().clear();
        Ok(())
    }

    async fn xml_report(&self) -> Result<Vec<u8>> {
        self.check_reachable()?;
        Ok(XML_REPORT.to_vec())
    }

    async fn html_report(&self) -> Result<Vec<u8>> {
        self.check_reachable()?;
        Ok(HTML_REPORT.to_vec())
    }
}
