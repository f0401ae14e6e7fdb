//! `serve` — run the leaderboard web server.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::args::ServeArgs;
use crate::error::BoxboardError;
use crate::games::client::GamesApiClient;
use crate::games::ingest;
use crate::observability::init_metrics;
use crate::server::{self, AppState};
use crate::settings::Settings;

/// Start the web server and run until cancelled.
///
/// # Errors
///
/// Returns an error when the listen address or metrics port cannot be
/// bound, or when the server fails while running.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<(), BoxboardError> {
    let settings = apply_overrides(Settings::from_env(), args);

    if settings.has_default_admin_password() {
        warn!("admin password is the default; set BOXBOARD_ADMIN_PASSWORD");
    }

    if let Some(port) = args.metrics_port {
        init_metrics(port).map_err(std::io::Error::other)?;
    }

    let client = GamesApiClient::from_settings(&settings)?;
    let state = AppState::new(settings, Arc::new(client));

    if args.refresh_on_start {
        match ingest::refresh(
            &state.store,
            state.source.as_ref(),
            &state.settings.data_dir,
            state.settings.year,
            state.settings.affiliate_id,
        )
        .await
        {
            Ok(summary) => info!(
                entrants = summary.entrant_count,
                scores = summary.score_count,
                "initial standings loaded"
            ),
            // The server is still useful without standings; a manual
            // refresh can succeed later.
            Err(e) => warn!(error = %e, "initial refresh failed, starting with empty standings"),
        }
    }

    server::serve(state, cancel).await?;
    Ok(())
}

fn apply_overrides(mut settings: Settings, args: &ServeArgs) -> Settings {
    if let Some(bind) = &args.bind {
        settings.bind_addr = bind.clone();
    }
    if let Some(year) = args.year {
        settings.year = year;
    }
    if let Some(affiliate_id) = args.affiliate_id {
        settings.affiliate_id = affiliate_id;
    }
    if let Some(data_dir) = &args.data_dir {
        settings.data_dir = data_dir.clone();
    }
    if let Some(static_dir) = &args.static_dir {
        settings.static_dir = static_dir.clone();
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_what_was_given() {
        let args = ServeArgs {
            bind: Some("127.0.0.1:9999".to_owned()),
            year: Some(2023),
            affiliate_id: None,
            data_dir: None,
            static_dir: None,
            metrics_port: None,
            refresh_on_start: false,
        };
        let base = Settings::default();
        let expected_affiliate = base.affiliate_id;
        let updated = apply_overrides(base, &args);
        assert_eq!(updated.bind_addr, "127.0.0.1:9999");
        assert_eq!(updated.year, 2023);
        assert_eq!(updated.affiliate_id, expected_affiliate);
    }
}
