//! Leaderboard API client.
//!
//! `LeaderboardSource` is the seam between the refresh pipeline and the
//! network: production uses `GamesApiClient`, tests substitute canned
//! sources. One division is fetched page by page; a full affiliate fetch
//! runs all divisions concurrently.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;
use crate::games::model::{LeaderboardPage, LeaderboardRow};
use crate::games::{DIVISIONS, PER_PAGE, SCORE_VIEW};
use crate::observability::metrics;
use crate::settings::Settings;

/// Something that can produce the leaderboard rows of one division.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn division_rows(
        &self,
        year: u16,
        affiliate_id: i64,
        division: u16,
    ) -> Result<Vec<LeaderboardRow>, FetchError>;
}

/// HTTP client against the public Games API.
pub struct GamesApiClient {
    http: reqwest::Client,
    base_url: String,
    throttle: Duration,
    timeout: Duration,
}

impl GamesApiClient {
    /// Builds a client from runtime settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(
            settings.api_base_url.clone(),
            settings.request_throttle,
            settings.request_timeout,
        )
    }

    /// Builds a client with explicit tuning.
    pub fn new(
        base_url: String,
        throttle: Duration,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("boxboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url,
            throttle,
            timeout,
        })
    }
}

#[async_trait]
impl LeaderboardSource for GamesApiClient {
    async fn division_rows(
        &self,
        year: u16,
        affiliate_id: i64,
        division: u16,
    ) -> Result<Vec<LeaderboardRow>, FetchError> {
        let url = crate::games::leaderboard_url(&self.base_url, year);
        let mut rows = Vec::new();
        let mut page = 1u32;
        loop {
            if page > 1 && !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("affiliate", affiliate_id.to_string()),
                    ("page", page.to_string()),
                    ("per_page", PER_PAGE.to_string()),
                    ("view", SCORE_VIEW.to_string()),
                    ("division", division.to_string()),
                ])
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        FetchError::Timeout {
                            division,
                            seconds: self.timeout.as_secs(),
                        }
                    } else {
                        FetchError::Request {
                            division,
                            message: e.to_string(),
                        }
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    division,
                    status: status.as_u16(),
                });
            }

            let body: LeaderboardPage =
                response.json().await.map_err(|e| FetchError::Decode {
                    division,
                    message: e.to_string(),
                })?;
            metrics::record_upstream_page(division);

            let total_pages = body.pagination.total_pages.max(1);
            rows.extend(body.leaderboard_rows);
            if total_pages <= page {
                break;
            }
            page += 1;
        }
        debug!(division, rows = rows.len(), pages = page, "division fetched");
        Ok(rows)
    }
}

/// Fetches every division of an affiliate concurrently and flattens the
/// results in division-table order.
pub async fn fetch_affiliate(
    source: &dyn LeaderboardSource,
    year: u16,
    affiliate_id: i64,
) -> Result<Vec<LeaderboardRow>, FetchError> {
    let fetches = DIVISIONS
        .iter()
        .map(|(division, _)| source.division_rows(year, affiliate_id, *division));
    let per_division = futures::future::try_join_all(fetches).await?;
    Ok(per_division.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::model::WireEntrant;

    struct CannedSource;

    #[async_trait]
    impl LeaderboardSource for CannedSource {
        async fn division_rows(
            &self,
            _year: u16,
            _affiliate_id: i64,
            division: u16,
        ) -> Result<Vec<LeaderboardRow>, FetchError> {
            // One row per division, carrying the division id as the
            // competitor id so ordering is observable.
            Ok(vec![LeaderboardRow {
                entrant: WireEntrant {
                    competitor_id: i64::from(division),
                    ..WireEntrant::default()
                },
                scores: vec![],
            }])
        }
    }

    #[tokio::test]
    async fn affiliate_fetch_flattens_in_division_order() {
        let rows = fetch_affiliate(&CannedSource, 2024, 31316).await.unwrap();
        assert_eq!(rows.len(), DIVISIONS.len());
        let ids: Vec<i64> = rows.iter().map(|r| r.entrant.competitor_id).collect();
        assert_eq!(ids[0], 1);
        assert_eq!(ids[1], 2);
        assert_eq!(ids[2], 18);
    }

    struct FailingSource;

    #[async_trait]
    impl LeaderboardSource for FailingSource {
        async fn division_rows(
            &self,
            _year: u16,
            _affiliate_id: i64,
            division: u16,
        ) -> Result<Vec<LeaderboardRow>, FetchError> {
            if division == 3 {
                Err(FetchError::Status {
                    division,
                    status: 503,
                })
            } else {
                Ok(vec![])
            }
        }
    }

    #[tokio::test]
    async fn one_failing_division_fails_the_fetch() {
        let err = fetch_affiliate(&FailingSource, 2024, 31316)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { division: 3, .. }));
    }
}
