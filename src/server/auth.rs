//! Session-cookie authentication for the admin pages.
//!
//! Sessions live in memory only. A restart logs everyone out, which is
//! acceptable for a single-gym deployment.

use axum::Form;
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::observability::metrics;
use crate::server::{ApiError, AppState, partials};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "boxboard_session";

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session table with lazy expiry.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: std::time::Duration) -> Self {
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(secs),
        }
    }

    /// Creates a session and returns its token.
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_owned(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.insert(token.clone(), session);
        metrics::record_session_delta(1);
        token
    }

    /// Returns the username behind a live token, dropping it if expired.
    pub fn validate(&self, token: &str) -> Option<String> {
        let expired = match self.sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => {
                return Some(session.username.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired && self.sessions.remove(token).is_some() {
            metrics::record_session_delta(-1);
        }
        None
    }

    /// Removes a session if present.
    pub fn revoke(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            metrics::record_session_delta(-1);
        }
    }

    /// Number of stored sessions, live or not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// TTL in whole seconds, for the cookie `Max-Age`.
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

/// Pulls the session token out of the `Cookie` header, if any.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, token)) = pair.trim().split_once('=')
                && name.trim() == SESSION_COOKIE
            {
                return Some(token.trim().to_owned());
            }
        }
    }
    None
}

/// True when the request carries a live admin session.
#[must_use]
pub fn is_admin(state: &AppState, headers: &HeaderMap) -> bool {
    token_from_headers(headers)
        .and_then(|token| state.sessions.validate(&token))
        .is_some()
}

/// Admin gate for mutating endpoints.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if is_admin(state, headers) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Checks the credentials and hands out a session cookie.
///
/// Success responds with `HX-Redirect` so the htmx form jumps to the admin
/// pages; failure re-renders the alert fragment with a 401.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let ok = form.username == state.settings.admin_username
        && form.password == state.settings.admin_password;
    if !ok {
        warn!(username = %form.username, "rejected login");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Html(partials::login_failed()),
        )
            .into_response());
    }

    let token = state.sessions.create(&form.username);
    info!(username = %form.username, "admin logged in");
    let cookie = session_cookie(&token, state.sessions.ttl_seconds());

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    headers.insert("HX-Redirect", HeaderValue::from_static("/assign_teams"));
    Ok((headers, Html(partials::login_succeeded())).into_response())
}

/// Drops the session and clears the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        state.sessions.revoke(&token);
    }
    let mut out = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&session_cookie("", 0)) {
        out.insert(SET_COOKIE, value);
    }
    (out, Redirect::temporary("/")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_validate_round_trips() {
        let store = SessionStore::new(std::time::Duration::from_secs(60));
        let token = store.create("admin");
        assert_eq!(store.validate(&token), Some("admin".to_owned()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn expired_sessions_are_purged_on_validate() {
        let store = SessionStore::new(std::time::Duration::ZERO);
        let token = store.create("admin");
        assert_eq!(store.validate(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn revoke_is_idempotent() {
        let store = SessionStore::new(std::time::Duration::from_secs(60));
        let token = store.create("admin");
        store.revoke(&token);
        store.revoke(&token);
        assert_eq!(store.validate(&token), None);
    }

    #[test]
    fn token_is_parsed_out_of_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; boxboard_session=abc123; other=1"),
        );
        assert_eq!(token_from_headers(&headers), Some("abc123".to_owned()));

        let mut missing = HeaderMap::new();
        missing.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(token_from_headers(&missing), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_string_has_the_expected_attributes() {
        let cookie = session_cookie("tok", 3600);
        assert_eq!(
            cookie,
            "boxboard_session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );
    }
}
