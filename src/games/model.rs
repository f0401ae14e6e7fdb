//! Wire model for leaderboard API responses.
//!
//! The API is loose with types: most numbers arrive as strings, empty
//! strings stand in for missing values, and optional blocks disappear
//! entirely. Every numeric field goes through a lenient deserializer so a
//! sloppy payload degrades to defaults instead of failing the whole
//! refresh.

use serde::Deserialize;

/// One page of leaderboard results.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    #[serde(default)]
    pub leaderboard_rows: Vec<LeaderboardRow>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination block; a missing block means a single page.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "default_total_pages", deserialize_with = "de::lenient_u32")]
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { total_pages: 1 }
    }
}

const fn default_total_pages() -> u32 {
    1
}

/// One entrant with their per-event scores.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub entrant: WireEntrant,
    #[serde(default)]
    pub scores: Vec<WireScore>,
}

/// Entrant identity as the API reports it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntrant {
    #[serde(deserialize_with = "de::lenient_i64")]
    pub competitor_id: i64,
    #[serde(default)]
    pub competitor_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub age: u32,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub division_id: u32,
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub affiliate_id: i64,
}

/// One event score as the API reports it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScore {
    #[serde(deserialize_with = "de::lenient_u32")]
    pub ordinal: u32,
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub rank: i64,
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub score: i64,
    #[serde(default)]
    pub score_display: String,
    #[serde(default, deserialize_with = "de::lenient_u8")]
    pub scaled: u8,
    /// Judge name; empty strings are normalized to `None`.
    #[serde(default, deserialize_with = "de::optional_name")]
    pub judge: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_opt_i64")]
    pub reps: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_opt_i64")]
    pub time_ms: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_opt_i64")]
    pub tiebreak_ms: Option<i64>,
}

/// Deserializers tolerant of the API's string-typed numbers.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    fn raw_to_i64<E: Error>(raw: Raw) -> Result<i64, E> {
        match raw {
            Raw::Int(n) => Ok(n),
            Raw::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(0)
                } else {
                    trimmed
                        .parse()
                        .map_err(|_| E::custom(format!("invalid numeric string {s:?}")))
                }
            }
        }
    }

    pub fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        raw_to_i64(Raw::deserialize(deserializer)?)
    }

    pub fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let n = raw_to_i64::<D::Error>(Raw::deserialize(deserializer)?)?;
        u32::try_from(n).map_err(|_| D::Error::custom(format!("value {n} out of range for u32")))
    }

    pub fn lenient_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let n = raw_to_i64::<D::Error>(Raw::deserialize(deserializer)?)?;
        u8::try_from(n).map_err(|_| D::Error::custom(format!("value {n} out of range for u8")))
    }

    pub fn lenient_opt_i64<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    trimmed
                        .parse()
                        .map(Some)
                        .map_err(|_| D::Error::custom(format!("invalid numeric string {s:?}")))
                }
            }
        }
    }

    /// `Some` only for non-blank strings.
    pub fn optional_name<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
    }
}
