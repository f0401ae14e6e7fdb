//! The refresh pipeline: fetch an affiliate's leaderboard, load the roster
//! CSVs, and rebuild the store in one shot.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::games::client::{LeaderboardSource, fetch_affiliate};
use crate::observability::metrics;
use crate::roster;
use crate::store::Store;

/// Counts reported after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub year: u16,
    pub affiliate_id: i64,
    pub entrant_count: usize,
    pub score_count: usize,
}

/// Runs a full refresh against `source`, replacing the store contents.
///
/// Fetch and roster load happen before the store is touched, so a failed
/// refresh leaves the previous standings in place.
pub async fn refresh(
    store: &Store,
    source: &dyn LeaderboardSource,
    roster_dir: &Path,
    year: u16,
    affiliate_id: i64,
) -> Result<RefreshSummary> {
    let started = Instant::now();
    let result = run(store, source, roster_dir, year, affiliate_id).await;
    metrics::record_refresh(result.is_ok(), started.elapsed());
    result
}

async fn run(
    store: &Store,
    source: &dyn LeaderboardSource,
    roster_dir: &Path,
    year: u16,
    affiliate_id: i64,
) -> Result<RefreshSummary> {
    info!(year, affiliate_id, "refreshing leaderboard data");
    let rows = fetch_affiliate(source, year, affiliate_id).await?;
    let roster = roster::load_dir(roster_dir)?;

    let entrant_count = rows.len();
    let score_count = rows.iter().map(|r| r.scores.len()).sum();
    store.replace(year, rows, &roster).await;
    metrics::record_store_size(entrant_count, score_count);

    info!(
        entrants = entrant_count,
        scores = score_count,
        "refresh complete"
    );
    Ok(RefreshSummary {
        year,
        affiliate_id,
        entrant_count,
        score_count,
    })
}
