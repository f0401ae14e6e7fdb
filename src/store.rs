//! In-memory standings store.
//!
//! A refresh rebuilds the whole world from the API plus the roster files,
//! so there is nothing durable to manage: state lives behind one async
//! `RwLock` and every query is a read. Athletes survive re-refreshes (a
//! returning competitor keeps their identity row); scores are replaced
//! wholesale each time.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::games;
use crate::games::model::{LeaderboardRow, WireEntrant, WireScore};
use crate::roster::{ROLE_MEMBER, Roster};
use crate::scoring;

/// Team name given to athletes missing from `team_assignments.csv`.
pub const UNASSIGNED_TEAM: &str = "Unassigned";

/// Scoring category an athlete competes in at the affiliate, derived from
/// age. Variant order matches the lexicographic order of the labels, so
/// sorting descending gives Open, then Masters 55+, then Masters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeCategory {
    Masters,
    Masters55,
    Open,
}

impl AgeCategory {
    #[must_use]
    pub const fn from_age(age: u32) -> Self {
        if age >= games::MASTERS_55_AGE_CUTOFF {
            Self::Masters55
        } else if age >= games::MASTERS_AGE_CUTOFF {
            Self::Masters
        } else {
            Self::Open
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Masters => "Masters",
            Self::Masters55 => "Masters 55+",
            Self::Open => "Open",
        }
    }
}

impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One competitor, identity from the API plus gym-side team fields.
#[derive(Debug, Clone)]
pub struct Athlete {
    pub competitor_id: i64,
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub age_category: AgeCategory,
    pub division: String,
    pub affiliate_id: i64,
    pub year: u16,
    pub team: String,
    pub role: u8,
}

impl Athlete {
    #[must_use]
    pub fn from_wire(entrant: &WireEntrant, year: u16) -> Self {
        let division = u16::try_from(entrant.division_id)
            .ok()
            .and_then(games::division_name)
            .unwrap_or("Unknown")
            .to_owned();
        Self {
            competitor_id: entrant.competitor_id,
            name: entrant.competitor_name.clone(),
            gender: entrant.gender.clone(),
            age: entrant.age,
            age_category: AgeCategory::from_age(entrant.age),
            division,
            affiliate_id: entrant.affiliate_id,
            year,
            team: UNASSIGNED_TEAM.to_owned(),
            role: ROLE_MEMBER,
        }
    }
}

/// Intramural points attached to one score row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub participation: u32,
    pub top3: u32,
    pub attendance: u32,
    pub judge: u32,
    pub side_challenge: u32,
    pub spirit: u32,
    pub total: u32,
}

/// One event score for one athlete.
#[derive(Debug, Clone)]
pub struct Score {
    pub competitor_id: i64,
    pub ordinal: u32,
    /// Event label, e.g. `24.2`.
    pub event: String,
    /// Worldwide rank as reported by the API.
    pub rank: i64,
    pub score: i64,
    pub score_display: String,
    pub scaled: u8,
    /// Whether the score counts as scaled at the affiliate level.
    pub affiliate_scaled: bool,
    pub judge: Option<String>,
    pub reps: Option<i64>,
    pub time_ms: Option<i64>,
    pub tiebreak_ms: Option<i64>,
    /// Rank within (event, gender, age category, scaled), shared on ties.
    pub affiliate_rank: u32,
    pub points: PointsBreakdown,
}

impl Score {
    #[must_use]
    pub fn from_wire(wire: &WireScore, competitor_id: i64, year: u16) -> Self {
        let participation = if wire.score > 0 {
            games::PARTICIPATION_POINTS
        } else {
            0
        };
        Self {
            competitor_id,
            ordinal: wire.ordinal,
            event: games::event_name(year, wire.ordinal),
            rank: wire.rank,
            score: wire.score,
            score_display: wire.score_display.clone(),
            scaled: wire.scaled,
            affiliate_scaled: wire.scaled > 0,
            judge: wire.judge.clone(),
            reps: wire.reps,
            time_ms: wire.time_ms,
            tiebreak_ms: wire.tiebreak_ms,
            affiliate_rank: 0,
            points: PointsBreakdown {
                participation,
                ..PointsBreakdown::default()
            },
        }
    }
}

/// Per-team totals for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScoreRow {
    pub team: String,
    /// Score rows contributing to this event.
    pub athletes: usize,
    pub participation: u32,
    pub top3: u32,
    pub attendance: u32,
    pub judge: u32,
    pub side_challenge: u32,
    pub spirit: u32,
    pub total: u32,
}

/// One leaderboard podium entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub team: String,
    pub affiliate_scaled: bool,
    pub affiliate_rank: u32,
    pub score_display: String,
}

/// One row of the full athlete-scores table.
#[derive(Debug, Clone)]
pub struct AthleteScoreRow {
    pub name: String,
    pub team: String,
    pub affiliate_scaled: bool,
    pub affiliate_rank: u32,
    pub score_display: String,
    pub reps: Option<i64>,
    pub time_ms: Option<i64>,
    pub tiebreak_ms: Option<i64>,
    pub points: PointsBreakdown,
}

/// One row of the team-management tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub competitor_id: i64,
    pub name: String,
    pub team: String,
    pub role: u8,
}

#[derive(Debug, Default)]
struct World {
    athletes: IndexMap<i64, Athlete>,
    scores: Vec<Score>,
    last_refresh: Option<DateTime<Utc>>,
}

/// Shared standings state.
#[derive(Debug, Default)]
pub struct Store {
    world: RwLock<World>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the store from freshly fetched rows and the roster,
    /// running the full scoring pipeline. Existing athletes keep their
    /// identity row; scores are replaced.
    pub async fn replace(&self, year: u16, rows: Vec<LeaderboardRow>, roster: &Roster) {
        let mut world = self.world.write().await;
        let mut athletes = std::mem::take(&mut world.athletes);
        let mut scores = Vec::new();
        for row in &rows {
            let competitor_id = row.entrant.competitor_id;
            athletes
                .entry(competitor_id)
                .or_insert_with(|| Athlete::from_wire(&row.entrant, year));
            for wire in &row.scores {
                scores.push(Score::from_wire(wire, competitor_id, year));
            }
        }

        scoring::run(roster, &mut athletes, &mut scores);

        world.athletes = athletes;
        world.scores = scores;
        world.last_refresh = Some(Utc::now());
    }

    /// (athlete count, score count).
    pub async fn counts(&self) -> (usize, usize) {
        let world = self.world.read().await;
        (world.athletes.len(), world.scores.len())
    }

    /// When the store was last rebuilt.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.world.read().await.last_refresh
    }

    /// Per-team totals for one event, ordered by team name.
    pub async fn team_scores(&self, ordinal: u32) -> Vec<TeamScoreRow> {
        let world = self.world.read().await;
        let mut teams: BTreeMap<String, TeamScoreRow> = BTreeMap::new();
        for score in world.scores.iter().filter(|s| s.ordinal == ordinal) {
            let Some(athlete) = world.athletes.get(&score.competitor_id) else {
                continue;
            };
            let row = teams
                .entry(athlete.team.clone())
                .or_insert_with(|| TeamScoreRow {
                    team: athlete.team.clone(),
                    athletes: 0,
                    participation: 0,
                    top3: 0,
                    attendance: 0,
                    judge: 0,
                    side_challenge: 0,
                    spirit: 0,
                    total: 0,
                });
            row.athletes += 1;
            row.participation += score.points.participation;
            row.top3 += score.points.top3;
            row.attendance += score.points.attendance;
            row.judge += score.points.judge;
            row.side_challenge += score.points.side_challenge;
            row.spirit += score.points.spirit;
            row.total += score.points.total;
        }
        teams.into_values().collect()
    }

    /// Season totals per team across all events, ordered by team name.
    pub async fn overall_scores(&self) -> Vec<(String, u32)> {
        let world = self.world.read().await;
        let mut totals: BTreeMap<String, u32> = BTreeMap::new();
        for score in &world.scores {
            let Some(athlete) = world.athletes.get(&score.competitor_id) else {
                continue;
            };
            *totals.entry(athlete.team.clone()).or_default() += score.points.total;
        }
        totals.into_iter().collect()
    }

    /// Podium (top 3 affiliate ranks) for one event, grouped by
    /// `gender-category` in display order.
    pub async fn leaderboard(&self, ordinal: u32) -> IndexMap<String, Vec<LeaderboardEntry>> {
        let world = self.world.read().await;
        let mut rows = joined_rows(&world, ordinal);
        rows.retain(|r| r.affiliate_rank <= games::TOP3_RANK_CUTOFF);
        let mut grouped: IndexMap<String, Vec<LeaderboardEntry>> = IndexMap::new();
        for row in rows {
            grouped
                .entry(row.category())
                .or_default()
                .push(LeaderboardEntry {
                    name: row.name,
                    team: row.team,
                    affiliate_scaled: row.affiliate_scaled,
                    affiliate_rank: row.affiliate_rank,
                    score_display: row.score_display,
                });
        }
        grouped
    }

    /// Every score of one event, grouped by `gender-category` in display
    /// order.
    pub async fn athlete_scores(&self, ordinal: u32) -> IndexMap<String, Vec<AthleteScoreRow>> {
        let world = self.world.read().await;
        let rows = joined_rows(&world, ordinal);
        let mut grouped: IndexMap<String, Vec<AthleteScoreRow>> = IndexMap::new();
        for row in rows {
            grouped
                .entry(row.category())
                .or_default()
                .push(AthleteScoreRow {
                    name: row.name,
                    team: row.team,
                    affiliate_scaled: row.affiliate_scaled,
                    affiliate_rank: row.affiliate_rank,
                    score_display: row.score_display,
                    reps: row.reps,
                    time_ms: row.time_ms,
                    tiebreak_ms: row.tiebreak_ms,
                    points: row.points,
                });
        }
        grouped
    }

    /// All athletes grouped by team, leaders first within each team.
    pub async fn teams(&self) -> IndexMap<String, Vec<TeamMember>> {
        let world = self.world.read().await;
        let mut members = member_rows(&world);
        sort_members(&mut members);
        let mut grouped: IndexMap<String, Vec<TeamMember>> = IndexMap::new();
        for member in members {
            grouped.entry(member.team.clone()).or_default().push(member);
        }
        grouped
    }

    /// Athletes whose name contains `query` (case-insensitive), in team
    /// order.
    pub async fn search_athletes(&self, query: &str) -> Vec<TeamMember> {
        let needle = query.to_lowercase();
        let world = self.world.read().await;
        let mut members: Vec<TeamMember> = member_rows(&world)
            .into_iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .collect();
        sort_members(&mut members);
        members
    }

    /// Distinct team names, sorted.
    pub async fn team_names(&self) -> Vec<String> {
        let world = self.world.read().await;
        let names: BTreeSet<String> =
            world.athletes.values().map(|a| a.team.clone()).collect();
        names.into_iter().collect()
    }

    /// A single athlete's management row.
    pub async fn member(&self, competitor_id: i64) -> Option<TeamMember> {
        let world = self.world.read().await;
        world.athletes.get(&competitor_id).map(|a| TeamMember {
            competitor_id: a.competitor_id,
            name: a.name.clone(),
            team: a.team.clone(),
            role: a.role,
        })
    }

    /// Moves an athlete to a team. Returns the applied team, or `None`
    /// for an unknown athlete.
    pub async fn assign_team(&self, competitor_id: i64, team: &str) -> Option<String> {
        let mut world = self.world.write().await;
        let athlete = world.athletes.get_mut(&competitor_id)?;
        athlete.team = team.to_owned();
        Some(athlete.team.clone())
    }

    /// Sets an athlete's role code. Returns the applied code, or `None`
    /// for an unknown athlete.
    pub async fn assign_role(&self, competitor_id: i64, role: u8) -> Option<u8> {
        let mut world = self.world.write().await;
        let athlete = world.athletes.get_mut(&competitor_id)?;
        athlete.role = role;
        Some(athlete.role)
    }

    /// Renames a team everywhere it appears. Returns how many athletes
    /// moved.
    pub async fn rename_team(&self, from: &str, to: &str) -> usize {
        let mut world = self.world.write().await;
        let mut moved = 0;
        for athlete in world.athletes.values_mut() {
            if athlete.team == from {
                athlete.team = to.to_owned();
                moved += 1;
            }
        }
        moved
    }
}

/// A score joined to its athlete, carrying everything the score pages
/// sort and display.
struct JoinedRow {
    name: String,
    gender: String,
    age_category: AgeCategory,
    team: String,
    affiliate_scaled: bool,
    scaled: u8,
    score: i64,
    rank: i64,
    affiliate_rank: u32,
    score_display: String,
    reps: Option<i64>,
    time_ms: Option<i64>,
    tiebreak_ms: Option<i64>,
    points: PointsBreakdown,
}

impl JoinedRow {
    fn category(&self) -> String {
        format!("{}-{}", self.gender, self.age_category.label())
    }
}

/// Joins scores of one event to athletes and applies the display order:
/// gender, category descending, RX before scaled, best score first, ties
/// broken by worldwide rank then name.
fn joined_rows(world: &World, ordinal: u32) -> Vec<JoinedRow> {
    let mut rows: Vec<JoinedRow> = world
        .scores
        .iter()
        .filter(|s| s.ordinal == ordinal)
        .filter_map(|score| {
            let athlete = world.athletes.get(&score.competitor_id)?;
            Some(JoinedRow {
                name: athlete.name.clone(),
                gender: athlete.gender.clone(),
                age_category: athlete.age_category,
                team: athlete.team.clone(),
                affiliate_scaled: score.affiliate_scaled,
                scaled: score.scaled,
                score: score.score,
                rank: score.rank,
                affiliate_rank: score.affiliate_rank,
                score_display: score.score_display.clone(),
                reps: score.reps,
                time_ms: score.time_ms,
                tiebreak_ms: score.tiebreak_ms,
                points: score.points,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.gender
            .cmp(&b.gender)
            .then_with(|| b.age_category.cmp(&a.age_category))
            .then_with(|| a.affiliate_scaled.cmp(&b.affiliate_scaled))
            .then_with(|| a.scaled.cmp(&b.scaled))
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| b.rank.cmp(&a.rank))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

fn member_rows(world: &World) -> Vec<TeamMember> {
    world
        .athletes
        .values()
        .map(|a| TeamMember {
            competitor_id: a.competitor_id,
            name: a.name.clone(),
            team: a.team.clone(),
            role: a.role,
        })
        .collect()
}

fn sort_members(members: &mut [TeamMember]) {
    members.sort_by(|a, b| {
        a.team
            .cmp(&b.team)
            .then_with(|| b.role.cmp(&a.role))
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_categories_follow_the_cutoffs() {
        assert_eq!(AgeCategory::from_age(16), AgeCategory::Open);
        assert_eq!(AgeCategory::from_age(34), AgeCategory::Open);
        assert_eq!(AgeCategory::from_age(35), AgeCategory::Masters);
        assert_eq!(AgeCategory::from_age(54), AgeCategory::Masters);
        assert_eq!(AgeCategory::from_age(55), AgeCategory::Masters55);
        assert_eq!(AgeCategory::from_age(70), AgeCategory::Masters55);
    }

    #[test]
    fn category_sort_order_matches_labels() {
        // Descending: Open, Masters 55+, Masters.
        let mut cats = [AgeCategory::Masters55, AgeCategory::Open, AgeCategory::Masters];
        cats.sort_by(|a, b| b.cmp(a));
        assert_eq!(
            cats.map(AgeCategory::label),
            ["Open", "Masters 55+", "Masters"]
        );
    }

    #[test]
    fn entrant_conversion_defaults_team() {
        let entrant = WireEntrant {
            competitor_id: 9,
            competitor_name: "Alex Doe".into(),
            gender: "F".into(),
            age: 36,
            division_id: 19,
            affiliate_id: 31316,
        };
        let athlete = Athlete::from_wire(&entrant, 2024);
        assert_eq!(athlete.team, UNASSIGNED_TEAM);
        assert_eq!(athlete.age_category, AgeCategory::Masters);
        assert_eq!(athlete.division, "Women 35-39");
    }

    #[test]
    fn score_conversion_awards_participation_only_for_positive_scores() {
        let scored = Score::from_wire(
            &WireScore {
                ordinal: 1,
                score: 10,
                ..WireScore::default()
            },
            1,
            2024,
        );
        assert_eq!(scored.points.participation, games::PARTICIPATION_POINTS);
        assert_eq!(scored.event, "24.1");

        let unscored = Score::from_wire(
            &WireScore {
                ordinal: 1,
                score: 0,
                ..WireScore::default()
            },
            1,
            2024,
        );
        assert_eq!(unscored.points.participation, 0);
    }

    #[tokio::test]
    async fn rename_and_assign_mutate_the_world() {
        let store = Store::new();
        let rows = vec![
            LeaderboardRow {
                entrant: WireEntrant {
                    competitor_id: 1,
                    competitor_name: "Alex Doe".into(),
                    gender: "F".into(),
                    age: 30,
                    ..WireEntrant::default()
                },
                scores: vec![],
            },
            LeaderboardRow {
                entrant: WireEntrant {
                    competitor_id: 2,
                    competitor_name: "Sam Roe".into(),
                    gender: "M".into(),
                    age: 40,
                    ..WireEntrant::default()
                },
                scores: vec![],
            },
        ];
        store.replace(2024, rows, &Roster::default()).await;

        assert_eq!(store.team_names().await, vec![UNASSIGNED_TEAM.to_owned()]);
        assert_eq!(
            store.assign_team(1, "Team Red").await.as_deref(),
            Some("Team Red")
        );
        assert_eq!(store.assign_team(99, "Team Red").await, None);
        assert_eq!(store.rename_team("Team Red", "Team Crimson").await, 1);
        assert_eq!(
            store.team_names().await,
            vec!["Team Crimson".to_owned(), UNASSIGNED_TEAM.to_owned()]
        );

        let found = store.search_athletes("alex").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].team, "Team Crimson");
        assert!(store.search_athletes("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn returning_athletes_keep_their_team() {
        let store = Store::new();
        let row = |name: &str| LeaderboardRow {
            entrant: WireEntrant {
                competitor_id: 1,
                competitor_name: name.into(),
                gender: "F".into(),
                age: 30,
                ..WireEntrant::default()
            },
            scores: vec![],
        };
        store.replace(2024, vec![row("Alex Doe")], &Roster::default()).await;
        store.assign_team(1, "Team Red").await;
        store.replace(2024, vec![row("Alex Doe")], &Roster::default()).await;
        let found = store.search_athletes("alex").await;
        assert_eq!(found[0].team, "Team Red");
    }
}
