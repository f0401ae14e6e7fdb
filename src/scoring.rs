//! Intramural scoring passes.
//!
//! Run order matters: team assignments first (bonuses target teams),
//! ranks before top-3, totals last. Every pass is a pure function over
//! the athlete map and score slice so the pipeline is testable without a
//! store or a network.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::games;
use crate::roster::{AttendanceRecord, Roster, TeamAssignment, TeamBonus};
use crate::store::{AgeCategory, Athlete, Score};

/// Applies the whole pipeline in order.
pub fn run(roster: &Roster, athletes: &mut IndexMap<i64, Athlete>, scores: &mut [Score]) {
    apply_team_assignments(athletes, &roster.assignments);
    apply_affiliate_ranks(scores, athletes);
    apply_top3(scores);
    apply_attendance(scores, athletes, &roster.attendance);
    apply_judge_points(scores, athletes);
    apply_team_bonus(scores, athletes, &roster.side_challenges, BonusKind::SideChallenge);
    apply_team_bonus(scores, athletes, &roster.spirit, BonusKind::Spirit);
    apply_totals(scores);
}

/// Moves rostered athletes onto their teams, matched by title-cased name.
pub fn apply_team_assignments(
    athletes: &mut IndexMap<i64, Athlete>,
    assignments: &[TeamAssignment],
) {
    for assignment in assignments {
        for athlete in athletes.values_mut() {
            if athlete.name == assignment.name {
                athlete.team = assignment.team.clone();
                athlete.role = assignment.role;
            }
        }
    }
}

/// Competition partition for affiliate ranking: every (event, gender,
/// age category, RX/scaled) pool ranks independently.
type RankPool = (u32, String, AgeCategory, bool);

/// Assigns affiliate ranks within each pool, ordered scaled-first
/// ascending then score descending. Ties share a rank and the next rank
/// skips past them, SQL `RANK()` style.
pub fn apply_affiliate_ranks(scores: &mut [Score], athletes: &IndexMap<i64, Athlete>) {
    let mut pools: HashMap<RankPool, Vec<usize>> = HashMap::new();
    for (i, score) in scores.iter().enumerate() {
        let Some(athlete) = athletes.get(&score.competitor_id) else {
            continue;
        };
        let pool = (
            score.ordinal,
            athlete.gender.clone(),
            athlete.age_category,
            score.affiliate_scaled,
        );
        pools.entry(pool).or_default().push(i);
    }

    for indices in pools.values_mut() {
        indices.sort_by(|&a, &b| {
            scores[a]
                .scaled
                .cmp(&scores[b].scaled)
                .then_with(|| scores[b].score.cmp(&scores[a].score))
        });
        let mut previous: Option<(u8, i64)> = None;
        let mut rank = 0u32;
        for (position, &index) in indices.iter().enumerate() {
            let key = (scores[index].scaled, scores[index].score);
            if previous != Some(key) {
                rank = u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1);
                previous = Some(key);
            }
            scores[index].affiliate_rank = rank;
        }
    }
}

/// Awards top-3 points to podium ranks.
pub fn apply_top3(scores: &mut [Score]) {
    for score in scores.iter_mut() {
        if score.affiliate_rank > 0 && score.affiliate_rank <= games::TOP3_RANK_CUTOFF {
            score.points.top3 = games::TOP3_POINTS;
        }
    }
}

/// Awards attendance points for (event, athlete) pairs on the sign-in
/// sheet.
pub fn apply_attendance(
    scores: &mut [Score],
    athletes: &IndexMap<i64, Athlete>,
    attendance: &[AttendanceRecord],
) {
    let name_index = name_index(athletes);
    let mut attended: HashSet<(i64, &str)> = HashSet::new();
    for record in attendance {
        if let Some(&competitor_id) = name_index.get(record.name.as_str()) {
            attended.insert((competitor_id, record.event.as_str()));
        }
    }
    for score in scores.iter_mut() {
        if attended.contains(&(score.competitor_id, score.event.as_str())) {
            score.points.attendance = games::ATTENDANCE_POINTS;
        }
    }
}

/// Awards judging points: any athlete named as a judge on someone's score
/// in an event gets the points on their own score for that event.
pub fn apply_judge_points(scores: &mut [Score], athletes: &IndexMap<i64, Athlete>) {
    let name_index = name_index(athletes);
    let mut judged: HashSet<(i64, u32)> = HashSet::new();
    for score in scores.iter() {
        if let Some(judge) = &score.judge
            && let Some(&competitor_id) = name_index.get(judge.as_str())
        {
            judged.insert((competitor_id, score.ordinal));
        }
    }
    for score in scores.iter_mut() {
        if judged.contains(&(score.competitor_id, score.ordinal)) {
            score.points.judge = games::JUDGE_POINTS;
        }
    }
}

/// Which bonus column a team bonus lands in.
#[derive(Debug, Clone, Copy)]
pub enum BonusKind {
    SideChallenge,
    Spirit,
}

/// Credits a team bonus to one score row of the team: the highest-role
/// member with a score in that event (first such row on role ties). The
/// points come from the CSV so organizers can weight events.
pub fn apply_team_bonus(
    scores: &mut [Score],
    athletes: &IndexMap<i64, Athlete>,
    bonuses: &[TeamBonus],
    kind: BonusKind,
) {
    for bonus in bonuses {
        let mut best: Option<(u8, usize)> = None;
        for (i, score) in scores.iter().enumerate() {
            if score.event != bonus.event {
                continue;
            }
            let Some(athlete) = athletes.get(&score.competitor_id) else {
                continue;
            };
            if athlete.team != bonus.team {
                continue;
            }
            if best.is_none_or(|(role, _)| athlete.role > role) {
                best = Some((athlete.role, i));
            }
        }
        if let Some((_, index)) = best {
            match kind {
                BonusKind::SideChallenge => scores[index].points.side_challenge = bonus.points,
                BonusKind::Spirit => scores[index].points.spirit = bonus.points,
            }
        }
    }
}

/// Sums the component points into the total.
pub fn apply_totals(scores: &mut [Score]) {
    for score in scores.iter_mut() {
        let p = &mut score.points;
        p.total = p.participation + p.top3 + p.attendance + p.judge + p.side_challenge + p.spirit;
    }
}

fn name_index(athletes: &IndexMap<i64, Athlete>) -> HashMap<&str, i64> {
    athletes
        .values()
        .map(|a| (a.name.as_str(), a.competitor_id))
        .collect()
}
