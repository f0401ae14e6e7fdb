//! JSON endpoints: health probe and the Games refresh trigger.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::response::Json;
use tracing::info;

use crate::games::ingest::{self, RefreshSummary};
use crate::server::{ApiError, AppState};

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Ok" }))
}

/// Clears the in-flight flag even when the request future is dropped.
pub(crate) struct RefreshSlot(Arc<AtomicBool>);

impl RefreshSlot {
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for RefreshSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Pulls fresh standings from the Games API and reloads the roster files.
///
/// Only one refresh runs at a time; a second request while one is in
/// flight gets `409 Conflict`.
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshSummary>, ApiError> {
    let Some(_slot) = RefreshSlot::acquire(&state.refreshing) else {
        return Err(ApiError::RefreshInProgress);
    };

    let summary = ingest::refresh(
        &state.store,
        state.source.as_ref(),
        &state.settings.data_dir,
        state.settings.year,
        state.settings.affiliate_id,
    )
    .await?;
    info!(
        entrants = summary.entrant_count,
        scores = summary.score_count,
        "refresh requested over http"
    );
    Ok(Json(summary))
}
