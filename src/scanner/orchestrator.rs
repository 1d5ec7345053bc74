//! Active-scan job tracking and progress polling
//!
//! A scan job moves `NotStarted -> Running(0..=99) -> Complete(100)` and
//! never transitions again; starting a new scan creates a new id rather
//! than resetting the previous one. The engine only exposes progress by
//! polling, so completion is observed through an explicit poll loop with
//! a caller-supplied interval and optional maximum wait.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::engine::{EngineClient, ScanId};
use crate::error::{Result, ZapscanError};

/// Caller-side scan state: the most recently started job id plus a
/// per-id progress high-watermark.
///
/// The watermark makes `progress()` monotonic non-decreasing for a
/// given id even if the engine briefly reports a lower value.
#[derive(Default)]
pub struct ScanTracker {
    last_scan: RwLock<Option<ScanId>>,
    watermarks: RwLock<HashMap<ScanId, u8>>,
}

impl ScanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly started job as the most recent one
    pub fn record(&self, scan_id: ScanId) {
        *self.last_scan.write() = Some(scan_id);
        self.watermarks.write().insert(scan_id, 0);
    }

    /// Id of the most recently started scan in this session
    pub fn last_scan_id(&self) -> Result<ScanId> {
        self.last_scan
            .read()
            .ok_or_else(|| ZapscanError::State("no scan has been started".to_string()))
    }

    /// Fold an engine-reported status into the watermark for `scan_id`
    /// and return the monotonic value.
    pub fn observe(&self, scan_id: ScanId, status: u8) -> u8 {
        let mut watermarks = self.watermarks.write();
        let watermark = watermarks.entry(scan_id).or_insert(0);
        if status > *watermark {
            *watermark = status;
        }
        *watermark
    }
}

/// Poll `scan_id` until it reports 100.
///
/// Sleeps `poll_interval` between polls; with a zero interval the loop
/// spins without real delay, which keeps tests clock-free. When
/// `max_wait` is set and elapses before completion, fails with a
/// `State` error; the scan itself keeps running engine-side.
pub async fn wait_for_scan<C: EngineClient>(
    engine: &C,
    tracker: &ScanTracker,
    scan_id: ScanId,
    poll_interval: Duration,
    max_wait: Option<Duration>,
) -> Result<()> {
    let started = Instant::now();

    loop {
        let status = tracker.observe(scan_id, engine.scan_status(scan_id).await?);
        tracing::debug!(%scan_id, status, "Scan progress");

        if status >= 100 {
            tracing::info!(%scan_id, "Active scan complete");
            return Ok(());
        }

        if let Some(max) = max_wait {
            if started.elapsed() >= max {
                return Err(ZapscanError::State(format!(
                    "scan {} still at {}% after {:?}",
                    scan_id, status, max
                )));
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    #[test]
    fn test_last_scan_id_before_any_scan() {
        let tracker = ScanTracker::new();
        assert!(matches!(
            tracker.last_scan_id().unwrap_err(),
            ZapscanError::State(_)
        ));
    }

    #[test]
    fn test_watermark_never_regresses() {
        let tracker = ScanTracker::new();
        let id = ScanId(3);
        tracker.record(id);

        assert_eq!(tracker.observe(id, 40), 40);
        assert_eq!(tracker.observe(id, 25), 40);
        assert_eq!(tracker.observe(id, 100), 100);
    }

    #[test]
    fn test_watermarks_independent_per_id() {
        let tracker = ScanTracker::new();
        tracker.record(ScanId(1));
        tracker.record(ScanId(2));

        assert_eq!(tracker.observe(ScanId(1), 80), 80);
        assert_eq!(tracker.observe(ScanId(2), 10), 10);
        assert_eq!(tracker.last_scan_id().unwrap(), ScanId(2));
    }

    #[tokio::test]
    async fn test_wait_for_scan_completes() {
        let engine = MockEngine::new();
        engine.script_next_scan(vec![10, 60, 100]);
        let id = engine.start_scan("http://localhost:9090/").await.unwrap();

        let tracker = ScanTracker::new();
        tracker.record(id);

        wait_for_scan(&engine, &tracker, id, Duration::ZERO, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_scan_times_out() {
        let engine = MockEngine::new();
        engine.script_next_scan(vec![10, 20]);
        let id = engine.start_scan("http://localhost:9090/").await.unwrap();

        let tracker = ScanTracker::new();
        tracker.record(id);

        let err = wait_for_scan(&engine, &tracker, id, Duration::ZERO, Some(Duration::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, ZapscanError::State(_)));
    }
}
