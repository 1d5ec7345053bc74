//! Report retrieval
//!
//! The engine renders the current finding set; the facade only moves
//! the bytes. Both calls are read-only and safe at any point in the
//! scan lifecycle.

use crate::engine::EngineClient;
use crate::error::Result;

/// Current findings as an XML document.
///
/// Begins with an XML declaration and ends with the report's closing
/// root tag (the engine's contract, asserted by the test suite).
pub(crate) async fn xml<C: EngineClient>(engine: &C) -> Result<Vec<u8>> {
    let report = engine.xml_report().await?;
    tracing::debug!(bytes = report.len(), "Fetched XML report");
    Ok(report)
}

/// Current findings as an HTML document, bracketed by `<html>`/`</html>`
/// once incidental whitespace is trimmed.
pub(crate) async fn html<C: EngineClient>(engine: &C) -> Result<Vec<u8>> {
    let report = engine.html_report().await?;
    tracing::debug!(bytes = report.len(), "Fetched HTML report");
    Ok(report)
}
