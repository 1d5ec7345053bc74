//! Request replay
//!
//! Resends a captured (or hand-built) request through the engine and
//! returns the resulting transactions. The request goes out exactly as
//! given: no header reordering, no cookie normalization, no body
//! re-encoding. HTTP error statuses on the way back are data, not
//! failures.

use crate::engine::EngineClient;
use crate::error::{Result, ZapscanError};
use crate::har::{HarEntry, HarRequest};

/// Replay `request` through the engine.
///
/// With `follow_redirects` set, 3xx responses are followed engine-side
/// and the result holds one transaction per hop, in order, the last one
/// non-redirect. Without it, exactly one transaction comes back.
pub(crate) async fn make_request<C: EngineClient>(
    engine: &C,
    request: &HarRequest,
    follow_redirects: bool,
) -> Result<Vec<HarEntry>> {
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        follow_redirects,
        "Replaying request"
    );

    let entries = engine.send_request(request, follow_redirects).await?;
    if entries.is_empty() {
        return Err(ZapscanError::proxy(
            "sendHarRequest",
            "replay produced no transactions",
        ));
    }

    Ok(entries)
}
