//! zapscan - scanning proxy facade
//!
//! Drives a ZAP-compatible man-in-the-middle proxy over its HTTP API:
//! captured browser traffic becomes a structured, replayable HAR
//! history; captured requests can be mutated and resent through the
//! same proxy; passive and active vulnerability scans are configured,
//! started and polled to completion; findings come back as typed
//! alerts or rendered XML/HTML reports.
//!
//! ```no_run
//! use std::time::Duration;
//! use zapscan::{ProxyConnection, ProxyScanner};
//!
//! # async fn run() -> zapscan::Result<()> {
//! let connection = ProxyConnection::configure("127.0.0.1", 8888, "")?;
//! let scanner = ProxyScanner::connect(&connection)?;
//!
//! // A browser driven through connection.proxy_descriptor() has
//! // produced traffic; replay the first capture with a probe cookie.
//! let history = scanner.history().await?;
//! let probe = history[0].request.with_cookie_value("JSESSIONID", "nothing")?;
//! let replayed = scanner.make_request(&probe, true).await?;
//! assert_eq!(replayed[0].request.cookie("JSESSIONID"), Some("nothing"));
//!
//! // Scan with one rule enabled and poll to completion.
//! scanner.set_enable_scanners(&["40018"], true).await?;
//! scanner.scan("http://localhost:9090/").await?;
//! let scan_id = scanner.last_scan_id()?;
//! scanner
//!     .wait_for_scan(scan_id, Duration::from_secs(2), None)
//!     .await?;
//! let _alerts = scanner.alerts().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod engine;
pub mod error;
pub mod har;
pub mod scanner;

pub use connection::{ProxyConnection, ProxyDescriptor};
pub use engine::zap::ZapClient;
pub use engine::{EngineClient, ScanId};
pub use error::{Result, ZapscanError};
pub use har::{HarCookie, HarEntry, HarNameValue, HarRequest, HarResponse};
pub use scanner::alerts::{group_by_host, Alert, Confidence, Risk};
pub use scanner::ProxyScanner;
