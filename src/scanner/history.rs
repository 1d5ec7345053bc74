//! Traffic history access
//!
//! Read and clear the ordered log of transactions the engine has
//! observed. The facade holds no cache: every snapshot is a fresh
//! engine query, so multiple handles to one engine see the same state.

use crate::engine::EngineClient;
use crate::error::Result;
use crate::har::HarEntry;

/// Snapshot of all completed transactions, oldest first.
///
/// Entries whose response has not completed yet are not transactions
/// and are filtered out.
pub(crate) async fn snapshot<C: EngineClient>(engine: &C) -> Result<Vec<HarEntry>> {
    let entries = engine.get_history().await?;
    let total = entries.len();

    let complete: Vec<HarEntry> = entries.into_iter().filter(HarEntry::is_complete).collect();
    if complete.len() < total {
        tracing::debug!(
            pending = total - complete.len(),
            "Dropped in-flight entries from history snapshot"
        );
    }

    Ok(complete)
}

/// Destructively reset the engine-side history
pub(crate) async fn clear<C: EngineClient>(engine: &C) -> Result<()> {
    engine.clear_history().await?;
    tracing::info!("Proxy history cleared");
    Ok(())
}
