//! CrossFit Games Open integration: constants, wire model, API client,
//! and the refresh pipeline that pulls a whole affiliate into the store.

pub mod client;
pub mod ingest;
pub mod model;

pub use client::{GamesApiClient, LeaderboardSource, fetch_affiliate};
pub use ingest::{RefreshSummary, refresh};

use std::ops::RangeInclusive;

/// Base URL of the public leaderboard API.
pub const API_BASE_URL: &str = "https://c3po.crossfit.com/api/leaderboards/v2/competitions/open";

/// Competition year tracked by default.
pub const DEFAULT_YEAR: u16 = 2024;

/// Affiliate whose entrants are ingested by default.
pub const DEFAULT_AFFILIATE_ID: i64 = 31316;

/// Affiliate display name shown in page headers.
pub const DEFAULT_AFFILIATE_NAME: &str = "CrossFit MonkeyFlag";

/// Open workout ordinals. Three scored events per season.
pub const EVENT_ORDINALS: RangeInclusive<u32> = 1..=3;

/// Page size requested from the leaderboard API.
pub const PER_PAGE: u32 = 100;

/// Score view requested from the leaderboard API (0 = raw scores).
pub const SCORE_VIEW: u32 = 0;

/// Entrants at or above this age leave the Open category.
pub const MASTERS_AGE_CUTOFF: u32 = 35;

/// Entrants at or above this age score in the 55+ category.
pub const MASTERS_55_AGE_CUTOFF: u32 = 55;

/// Points for logging any valid score.
pub const PARTICIPATION_POINTS: u32 = 1;

/// Points for a top-3 affiliate rank in an event.
pub const TOP3_POINTS: u32 = 3;

/// Affiliate rank at or below which top-3 points are awarded.
pub const TOP3_RANK_CUTOFF: u32 = 3;

/// Points for judging at least one entrant in an event.
pub const JUDGE_POINTS: u32 = 2;

/// Points for attending the affiliate's scored heat of an event.
pub const ATTENDANCE_POINTS: u32 = 2;

/// Leaderboard divisions fetched per refresh, with API ids.
pub const DIVISIONS: [(u16, &str); 20] = [
    (1, "Men Open"),
    (2, "Women Open"),
    (18, "Men 35-39"),
    (19, "Women 35-39"),
    (12, "Men 40-44"),
    (13, "Women 40-44"),
    (3, "Men 45-49"),
    (4, "Women 45-49"),
    (5, "Men 50-54"),
    (6, "Women 50-54"),
    (7, "Men 55-59"),
    (8, "Women 55-59"),
    (36, "Men 60-64"),
    (37, "Women 60-64"),
    (38, "Men 65+"),
    (39, "Women 65+"),
    (16, "Men 16-17"),
    (17, "Women 16-17"),
    (14, "Men 14-15"),
    (15, "Women 14-15"),
];

/// Division display name for an API division id.
#[must_use]
pub fn division_name(id: u16) -> Option<&'static str> {
    DIVISIONS
        .iter()
        .find(|(division, _)| *division == id)
        .map(|(_, name)| *name)
}

/// Event label for a workout, e.g. `24.2` for ordinal 2 of 2024.
#[must_use]
pub fn event_name(year: u16, ordinal: u32) -> String {
    format!("{:02}.{ordinal}", year % 100)
}

/// Full leaderboard URL for a competition year.
#[must_use]
pub fn leaderboard_url(base: &str, year: u16) -> String {
    format!("{}/{year}/leaderboards", base.trim_end_matches('/'))
}
