//! Runtime settings sourced from `BOXBOARD_*` environment variables.
//!
//! Command-line flags override these where a flag exists; everything else
//! (credentials, upstream tuning) is environment-only so it never shows up
//! in `ps` output or shell history.

use std::path::PathBuf;
use std::time::Duration;

use crate::games;

/// Default listen address for the web UI.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default directory holding the roster CSV files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default directory served under `/static`.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// How long an admin session stays valid without re-login.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Per-request timeout against the Games API.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Open competition year being tracked (e.g. 2024).
    pub year: u16,
    /// CrossFit affiliate id whose entrants are ingested.
    pub affiliate_id: i64,
    /// Display name shown in the page header.
    pub affiliate_name: String,
    /// Directory holding roster CSV files.
    pub data_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Admin login for team-management pages.
    pub admin_username: String,
    /// Admin password. The default is for local development only.
    pub admin_password: String,
    /// Admin session lifetime.
    pub session_ttl: Duration,
    /// Base URL of the Games leaderboard API.
    pub api_base_url: String,
    /// Optional delay between leaderboard page requests.
    pub request_throttle: Duration,
    /// Timeout applied to each leaderboard request.
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            year: games::DEFAULT_YEAR,
            affiliate_id: games::DEFAULT_AFFILIATE_ID,
            affiliate_name: games::DEFAULT_AFFILIATE_NAME.to_owned(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            admin_username: "admin".to_owned(),
            admin_password: "admin".to_owned(),
            session_ttl: DEFAULT_SESSION_TTL,
            api_base_url: games::API_BASE_URL.to_owned(),
            request_throttle: Duration::ZERO,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Settings {
    /// Builds settings from the environment, falling back to defaults for
    /// anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_or("BOXBOARD_BIND", defaults.bind_addr),
            year: env_or("BOXBOARD_YEAR", defaults.year),
            affiliate_id: env_or("BOXBOARD_AFFILIATE_ID", defaults.affiliate_id),
            affiliate_name: env_or("BOXBOARD_AFFILIATE_NAME", defaults.affiliate_name),
            data_dir: env_or("BOXBOARD_DATA_DIR", defaults.data_dir),
            static_dir: env_or("BOXBOARD_STATIC_DIR", defaults.static_dir),
            admin_username: env_or("BOXBOARD_ADMIN_USER", defaults.admin_username),
            admin_password: env_or("BOXBOARD_ADMIN_PASSWORD", defaults.admin_password),
            session_ttl: env_duration_or("BOXBOARD_SESSION_TTL", defaults.session_ttl),
            api_base_url: env_or("BOXBOARD_API_URL", defaults.api_base_url),
            request_throttle: env_duration_or("BOXBOARD_THROTTLE", defaults.request_throttle),
            request_timeout: env_duration_or("BOXBOARD_REQUEST_TIMEOUT", defaults.request_timeout),
        }
    }

    /// True when the admin password was never changed from the shipped
    /// default. The server logs a warning in that case.
    #[must_use]
    pub fn has_default_admin_password(&self) -> bool {
        self.admin_password == "admin"
    }
}

/// Reads an environment variable and parses it, falling back to `default`
/// when unset or malformed.
fn env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// Reads a humantime duration (`"250ms"`, `"12h"`) from the environment.
fn env_duration_or(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|raw| humantime::parse_duration(&raw).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr, "0.0.0.0:8000");
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert!(settings.has_default_admin_password());
        assert_eq!(settings.session_ttl, Duration::from_secs(43_200));
    }

    #[test]
    fn env_or_falls_back_on_garbage() {
        // Unset variable.
        assert_eq!(env_or("BOXBOARD_TEST_UNSET_VAR", 7_u16), 7);
    }

    #[test]
    fn duration_parsing_accepts_humantime_forms() {
        assert_eq!(
            humantime::parse_duration("90s").ok(),
            Some(Duration::from_secs(90))
        );
        assert_eq!(
            humantime::parse_duration("250ms").ok(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn changed_password_is_not_flagged() {
        let settings = Settings {
            admin_password: "s3cret".into(),
            ..Settings::default()
        };
        assert!(!settings.has_default_admin_password());
    }
}
