//! HTTP server: router, shared state, and the API error type.

pub mod api;
pub mod auth;
pub mod html;
pub mod pages;
pub mod partials;
pub mod static_files;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::{BoxboardError, ServerError};
use crate::games::client::LeaderboardSource;
use crate::observability::metrics;
use crate::settings::Settings;
use crate::store::Store;

/// Everything handlers share.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: Arc<auth::SessionStore>,
    pub settings: Arc<Settings>,
    pub source: Arc<dyn LeaderboardSource>,
    /// Guards against overlapping refreshes.
    pub refreshing: Arc<AtomicBool>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: Settings, source: Arc<dyn LeaderboardSource>) -> Self {
        let sessions = auth::SessionStore::new(settings.session_ttl);
        Self {
            store: Arc::new(Store::new()),
            sessions: Arc::new(sessions),
            settings: Arc::new(settings),
            source,
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Error responses for both the JSON API and the htmx endpoints.
#[derive(Debug)]
pub enum ApiError {
    /// No valid admin session.
    Unauthorized,
    /// Unknown resource (bad ordinal, unknown athlete, missing file).
    NotFound,
    /// A refresh is already running.
    RefreshInProgress,
    /// The Games API let us down.
    Upstream(String),
    /// Anything else.
    Internal(String),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RefreshInProgress => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Unauthorized => "not authorized".to_owned(),
            Self::NotFound => "not found".to_owned(),
            Self::RefreshInProgress => "a refresh is already running".to_owned(),
            Self::Upstream(msg) | Self::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, message = %self.message(), "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}

impl From<BoxboardError> for ApiError {
    fn from(err: BoxboardError) -> Self {
        match err {
            BoxboardError::Fetch(e) => Self::Upstream(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Builds the full route table.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/", get(root_redirect))
        .route("/team_scores", get(root_redirect))
        .route("/team_scores/{ordinal}", get(pages::team_scores))
        .route("/leaderboard/{ordinal}", get(pages::leaderboard))
        .route("/athlete_scores/{ordinal}", get(pages::athlete_scores))
        .route("/team_members", get(pages::team_members))
        .route("/refresh", get(pages::refresh_and_redirect))
        .route("/cf_games/refresh", put(api::refresh))
        .route("/login", get(pages::login).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/assign_teams", get(pages::assign_teams))
        .route("/rename_teams", get(pages::rename_teams))
        .route("/athlete_teams", post(pages::athlete_teams))
        .route(
            "/assign_athlete_team/{competitor_id}",
            put(pages::assign_athlete_team),
        )
        .route(
            "/assign_athlete_team_leader/{competitor_id}",
            put(pages::assign_athlete_team_leader),
        )
        .route("/rename_team/{team}", put(pages::rename_team))
        .route("/ui/refresh_button", get(pages::refresh_button))
        .route("/static/{*path}", get(static_files::serve))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

async fn root_redirect() -> Redirect {
    Redirect::temporary("/team_scores/1")
}

/// Records request count and latency per matched route template.
async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "__unmatched__".to_owned(), |m| m.as_str().to_owned());
    let started = Instant::now();
    let response = next.run(request).await;
    metrics::record_http_request(&route, response.status().as_u16(), started.elapsed());
    response
}

/// Binds the listen address and serves until the token is cancelled.
pub async fn serve(state: AppState, cancel: CancellationToken) -> Result<(), ServerError> {
    let addr = state.settings.bind_addr.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let local = listener
        .local_addr()
        .map_err(|source| ServerError::Serve { source })?;
    info!(addr = %local, "boxboard listening");

    let router = build_router(state);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|source| ServerError::Serve { source })?;
    info!("server stopped");
    Ok(())
}
