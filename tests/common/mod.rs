//! Shared integration-test harness: CLI spawning, fixtures, and a canned
//! leaderboard source feeding an in-process router.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tempfile::TempDir;

use boxboard::error::FetchError;
use boxboard::games::client::LeaderboardSource;
use boxboard::games::model::{LeaderboardRow, WireEntrant, WireScore};
use boxboard::server::{AppState, build_router};
use boxboard::settings::Settings;

/// Runs the boxboard binary with the given arguments and captures output.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_boxboard"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run boxboard")
}

/// Returns the path to a test fixture.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn entrant(id: i64, name: &str, gender: &str, age: u32, division_id: u32) -> WireEntrant {
    WireEntrant {
        competitor_id: id,
        competitor_name: name.to_owned(),
        gender: gender.to_owned(),
        age,
        division_id,
        affiliate_id: 31316,
    }
}

pub fn score(
    ordinal: u32,
    rank: i64,
    points: i64,
    display: &str,
    scaled: u8,
    judge: Option<&str>,
) -> WireScore {
    WireScore {
        ordinal,
        rank,
        score: points,
        score_display: display.to_owned(),
        scaled,
        judge: judge.map(str::to_owned),
        reps: None,
        time_ms: None,
        tiebreak_ms: None,
    }
}

/// A three-athlete gym: Jo and Ann (women, divisions Open/Masters via age)
/// and Sam (men). Jo judged Ann's first event.
pub struct CannedSource;

#[async_trait]
impl LeaderboardSource for CannedSource {
    async fn division_rows(
        &self,
        _year: u16,
        _affiliate_id: i64,
        division: u16,
    ) -> Result<Vec<LeaderboardRow>, FetchError> {
        let rows = match division {
            1 => vec![LeaderboardRow {
                entrant: entrant(201, "Sam Doe", "M", 28, 1),
                scores: vec![
                    score(1, 800, 1000, "100 reps", 0, None),
                    score(2, 700, 950, "10:45", 0, None),
                ],
            }],
            2 => vec![
                LeaderboardRow {
                    entrant: entrant(101, "Jo Smith", "F", 30, 2),
                    scores: vec![
                        score(1, 1000, 1200, "120 reps", 0, None),
                        score(2, 900, 1100, "11:30", 0, None),
                    ],
                },
                LeaderboardRow {
                    entrant: entrant(102, "Ann Lee", "F", 36, 2),
                    scores: vec![score(1, 1500, 900, "90 reps", 1, Some("Jo Smith"))],
                },
            ],
            _ => vec![],
        };
        Ok(rows)
    }
}

/// A source that never returns rows, for pages-before-first-refresh tests.
pub struct EmptySource;

#[async_trait]
impl LeaderboardSource for EmptySource {
    async fn division_rows(
        &self,
        _year: u16,
        _affiliate_id: i64,
        _division: u16,
    ) -> Result<Vec<LeaderboardRow>, FetchError> {
        Ok(vec![])
    }
}

/// A source whose fetch always fails, for upstream-error tests.
pub struct FailingSource;

#[async_trait]
impl LeaderboardSource for FailingSource {
    async fn division_rows(
        &self,
        _year: u16,
        _affiliate_id: i64,
        division: u16,
    ) -> Result<Vec<LeaderboardRow>, FetchError> {
        Err(FetchError::Status {
            division,
            status: 503,
        })
    }
}

/// An in-process app over temp data and static directories.
pub struct TestApp {
    pub state: AppState,
    pub data_dir: TempDir,
    pub static_dir: TempDir,
}

impl TestApp {
    pub fn new(source: Arc<dyn LeaderboardSource>) -> Self {
        let data_dir = tempfile::tempdir().expect("create data dir");
        let static_dir = tempfile::tempdir().expect("create static dir");
        let settings = Settings {
            data_dir: data_dir.path().to_path_buf(),
            static_dir: static_dir.path().to_path_buf(),
            ..Settings::default()
        };
        Self {
            state: AppState::new(settings, source),
            data_dir,
            static_dir,
        }
    }

    /// Fresh router over the shared state.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Drops a roster CSV into the data directory.
    pub fn write_roster(&self, file: &str, contents: &str) {
        std::fs::write(self.data_dir.path().join(file), contents).expect("write roster file");
    }

    /// Writes the standard roster for the canned gym. The CSV files are
    /// headerless.
    pub fn write_standard_roster(&self) {
        write_standard_roster_to(self.data_dir.path());
    }
}

/// Writes the standard canned-gym roster CSVs into `dir`.
pub fn write_standard_roster_to(dir: &Path) {
    let write = |file: &str, contents: &str| {
        std::fs::write(dir.join(file), contents).expect("write roster file");
    };
    write(
        "team_assignments.csv",
        "jo smith,Team Red,TL\nsam doe,Team Blue,C\nann lee,Team Red,\n",
    );
    write("attendance.csv", "24.1,ann lee\n");
    write("side_challenge.csv", "24.1,Team Red,5\n");
    write("spirit.csv", "24.2,Team Blue,4\n");
}
