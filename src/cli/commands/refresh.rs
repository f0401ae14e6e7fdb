//! `refresh` — pull standings once and print a summary.
//!
//! Useful for cron-style checks and for verifying credentials and roster
//! files without running the server.

use crate::cli::args::{OutputFormat, RefreshArgs};
use crate::error::BoxboardError;
use crate::games::client::GamesApiClient;
use crate::games::ingest;
use crate::settings::Settings;
use crate::store::Store;

/// Run one ingest into a throwaway store and report what it found.
///
/// # Errors
///
/// Returns an upstream error when the Games API is unreachable, or a
/// roster error when a CSV file is malformed.
pub async fn run(args: &RefreshArgs) -> Result<(), BoxboardError> {
    let mut settings = Settings::from_env();
    if let Some(year) = args.year {
        settings.year = year;
    }
    if let Some(affiliate_id) = args.affiliate_id {
        settings.affiliate_id = affiliate_id;
    }
    if let Some(data_dir) = &args.data_dir {
        settings.data_dir = data_dir.clone();
    }

    let client = GamesApiClient::from_settings(&settings)?;
    let store = Store::new();
    let summary = ingest::refresh(
        &store,
        &client,
        &settings.data_dir,
        settings.year,
        settings.affiliate_id,
    )
    .await?;

    match args.format {
        OutputFormat::Human => {
            println!(
                "Pulled {} athletes and {} scores for affiliate {} ({}).",
                summary.entrant_count, summary.score_count, summary.affiliate_id, summary.year
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
