//! Gym-side roster files.
//!
//! Four headerless CSV files live in the data directory, maintained by
//! hand between events:
//!
//! - `team_assignments.csv`: `name,team,role` where role is `TL` (team
//!   leader), `C` (captain), or blank
//! - `attendance.csv`: `event,name`
//! - `side_challenge.csv`: `event,team,points`
//! - `spirit.csv`: `event,team,points`
//!
//! Names are title-cased on load so hand-typed entries match the athlete
//! names the Games API reports. A missing file is an empty section, not an
//! error; gyms that skip side challenges simply never create the file.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::RosterError;

pub const TEAM_ASSIGNMENTS_FILE: &str = "team_assignments.csv";
pub const ATTENDANCE_FILE: &str = "attendance.csv";
pub const SIDE_CHALLENGE_FILE: &str = "side_challenge.csv";
pub const SPIRIT_FILE: &str = "spirit.csv";

/// Role code for a team leader.
pub const ROLE_TEAM_LEADER: u8 = 2;
/// Role code for a captain.
pub const ROLE_CAPTAIN: u8 = 1;
/// Role code for a regular member.
pub const ROLE_MEMBER: u8 = 0;

/// Everything the scoring passes need from the data directory.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub assignments: Vec<TeamAssignment>,
    pub attendance: Vec<AttendanceRecord>,
    pub side_challenges: Vec<TeamBonus>,
    pub spirit: Vec<TeamBonus>,
}

/// One `team_assignments.csv` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAssignment {
    /// Athlete name, title-cased.
    pub name: String,
    pub team: String,
    pub role: u8,
}

/// One `attendance.csv` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Event label, e.g. `24.1`.
    pub event: String,
    /// Athlete name, title-cased.
    pub name: String,
}

/// One side-challenge or spirit row. Points are carried in the file so
/// organizers can weight individual events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamBonus {
    pub event: String,
    pub team: String,
    pub points: u32,
}

/// Loads all roster files from a directory.
pub fn load_dir(dir: &Path) -> Result<Roster, RosterError> {
    let mut roster = Roster::default();

    if let Some(rows) = read_rows(&dir.join(TEAM_ASSIGNMENTS_FILE))? {
        for (line, row) in rows {
            let [name, team, role] = take_columns(TEAM_ASSIGNMENTS_FILE, line, row)?;
            roster.assignments.push(TeamAssignment {
                name: title_case(&name),
                team,
                role: role_code(&role),
            });
        }
    }

    if let Some(rows) = read_rows(&dir.join(ATTENDANCE_FILE))? {
        for (line, row) in rows {
            let [event, name] = take_columns(ATTENDANCE_FILE, line, row)?;
            roster.attendance.push(AttendanceRecord {
                event,
                name: title_case(&name),
            });
        }
    }

    roster.side_challenges = read_bonus_file(&dir.join(SIDE_CHALLENGE_FILE), SIDE_CHALLENGE_FILE)?;
    roster.spirit = read_bonus_file(&dir.join(SPIRIT_FILE), SPIRIT_FILE)?;

    debug!(
        assignments = roster.assignments.len(),
        attendance = roster.attendance.len(),
        side_challenges = roster.side_challenges.len(),
        spirit = roster.spirit.len(),
        "roster loaded"
    );
    Ok(roster)
}

fn read_bonus_file(path: &Path, file: &str) -> Result<Vec<TeamBonus>, RosterError> {
    let Some(rows) = read_rows(path)? else {
        return Ok(Vec::new());
    };
    let mut bonuses = Vec::new();
    for (line, row) in rows {
        let [event, team, points] = take_columns(file, line, row)?;
        let points = points
            .trim()
            .parse()
            .map_err(|_| RosterError::Parse {
                file: file.to_owned(),
                line,
                message: format!("invalid points value {points:?}"),
            })?;
        bonuses.push(TeamBonus {
            event,
            team,
            points,
        });
    }
    Ok(bonuses)
}

/// Reads and splits a CSV file. `None` when the file does not exist.
/// Blank lines are skipped; returned line numbers are 1-based.
fn read_rows(path: &Path) -> Result<Option<Vec<(usize, Vec<String>)>>, RosterError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "roster file missing, treating as empty");
            return Ok(None);
        }
        Err(source) => {
            return Err(RosterError::Io {
                file: path.display().to_string(),
                source,
            });
        }
    };
    let rows = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, split_csv_line(line)))
        .collect();
    Ok(Some(rows))
}

/// First `N` columns of a row; extra columns are ignored, too few is an
/// error.
fn take_columns<const N: usize>(
    file: &str,
    line: usize,
    mut row: Vec<String>,
) -> Result<[String; N], RosterError> {
    let got = row.len();
    row.truncate(N);
    row.try_into().map_err(|_| RosterError::MissingColumns {
        file: file.to_owned(),
        line,
        expected: N,
        got,
    })
}

/// Splits one CSV line, honoring double-quoted fields with `""` escapes.
/// Enough for hand-maintained files; no multi-line fields.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            other => field.push(other),
        }
    }
    fields.push(field);
    fields
}

/// Maps a role column value to its numeric code. Unknown labels are
/// regular members.
#[must_use]
pub fn role_code(label: &str) -> u8 {
    match label.trim() {
        "TL" => ROLE_TEAM_LEADER,
        "C" => ROLE_CAPTAIN,
        _ => ROLE_MEMBER,
    }
}

/// Display label for a role code.
#[must_use]
pub const fn role_label(code: u8) -> &'static str {
    match code {
        ROLE_TEAM_LEADER => "TL",
        ROLE_CAPTAIN => "C",
        _ => "",
    }
}

/// Title-cases a name the way the assignment sheets are matched against
/// API names: first letter after any non-letter is uppercased, the rest
/// lowercased. `"mary-jane o'neil"` becomes `"Mary-Jane O'Neil"`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut boundary = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}
