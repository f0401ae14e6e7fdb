//! htmx fragments returned by the partial endpoints.
//!
//! These render table rows and cells that swap in place, so their markup
//! has to stay in lockstep with the full pages in
//! [`crate::server::pages`].

use crate::roster;
use crate::server::html::escape;
use crate::store::TeamMember;

/// Percent-encodes a value for use as a single URL path segment.
#[must_use]
pub fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// The manual refresh control shown on the team-scores page.
#[must_use]
pub fn refresh_button() -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<div class=\"flex items-center gap-2\">".to_owned());
    lines.push(
        "  <button class=\"btn btn-primary btn-sm\" hx-put=\"/cf_games/refresh\" \
         hx-swap=\"none\" hx-indicator=\"#refresh-spinner\">Refresh scores</button>"
            .to_owned(),
    );
    lines.push(
        "  <span id=\"refresh-spinner\" class=\"htmx-indicator loading loading-spinner \
         loading-sm\"></span>"
            .to_owned(),
    );
    lines.push("</div>".to_owned());
    lines.join("\n")
}

#[must_use]
pub fn login_failed() -> String {
    "<div id=\"login-alert\" class=\"alert alert-error\">Invalid username or password.</div>"
        .to_owned()
}

#[must_use]
pub fn login_succeeded() -> String {
    "<div id=\"login-alert\" class=\"alert alert-success\">Logged in.</div>".to_owned()
}

/// Team cell with its inline reassignment select.
#[must_use]
pub fn team_cell(member: &TeamMember, team_names: &[String]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("<td id=\"team-cell-{}\">", member.competitor_id));
    lines.push(format!(
        "  <select class=\"select select-bordered select-sm\" name=\"team\" \
         hx-put=\"/assign_athlete_team/{}\" hx-trigger=\"change\" \
         hx-target=\"closest td\" hx-swap=\"outerHTML\">",
        member.competitor_id
    ));
    for name in team_names {
        let selected = if *name == member.team { " selected" } else { "" };
        lines.push(format!(
            "    <option value=\"{0}\"{selected}>{0}</option>",
            escape(name)
        ));
    }
    lines.push("  </select>".to_owned());
    lines.push("</td>".to_owned());
    lines.join("\n")
}

/// Role cell with the TL / C / member toggle buttons.
#[must_use]
pub fn role_cell(member: &TeamMember) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("<td id=\"role-cell-{}\">", member.competitor_id));
    lines.push("  <div class=\"join\">".to_owned());
    for (label, value) in [("TL", "TL"), ("C", "C"), ("Member", "")] {
        let code = roster::role_code(value);
        let class = if member.role == code {
            "btn btn-xs join-item btn-active"
        } else {
            "btn btn-xs join-item"
        };
        lines.push(format!(
            "    <button class=\"{class}\" hx-put=\"/assign_athlete_team_leader/{}\" \
             hx-vals='{{\"role\": \"{value}\"}}' hx-target=\"closest td\" \
             hx-swap=\"outerHTML\">{label}</button>",
            member.competitor_id
        ));
    }
    lines.push("  </div>".to_owned());
    lines.push("</td>".to_owned());
    lines.join("\n")
}

/// Table body for the athlete assignment page and its search endpoint.
#[must_use]
pub fn athlete_rows(members: &[TeamMember], team_names: &[String]) -> String {
    if members.is_empty() {
        return "<tr><td colspan=\"3\" class=\"text-center opacity-60\">No athletes found.</td></tr>"
            .to_owned();
    }
    let mut lines: Vec<String> = Vec::new();
    for member in members {
        lines.push(format!("<tr id=\"athlete-{}\">", member.competitor_id));
        lines.push(format!("  <td>{}</td>", escape(&member.name)));
        lines.push(team_cell(member, team_names));
        lines.push(role_cell(member));
        lines.push("</tr>".to_owned());
    }
    lines.join("\n")
}

/// One editable row of the rename-teams table.
#[must_use]
pub fn rename_row(team: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<tr>".to_owned());
    lines.push(format!("  <td>{}</td>", escape(team)));
    lines.push("  <td>".to_owned());
    lines.push("    <div class=\"join\">".to_owned());
    lines.push(format!(
        "      <input class=\"input input-bordered input-sm join-item\" type=\"text\" \
         name=\"name\" value=\"{}\">",
        escape(team)
    ));
    lines.push(format!(
        "      <button class=\"btn btn-sm join-item\" hx-put=\"/rename_team/{}\" \
         hx-include=\"closest tr\" hx-target=\"closest tr\" \
         hx-swap=\"outerHTML\">Rename</button>",
        encode_path_segment(team)
    ));
    lines.push("    </div>".to_owned());
    lines.push("  </td>".to_owned());
    lines.push("</tr>".to_owned());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{ROLE_MEMBER, ROLE_TEAM_LEADER};

    fn member() -> TeamMember {
        TeamMember {
            competitor_id: 42,
            name: "Jo Smith".to_owned(),
            team: "Team Red".to_owned(),
            role: ROLE_TEAM_LEADER,
        }
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(encode_path_segment("Team Red"), "Team%20Red");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("plain-name_1.x~"), "plain-name_1.x~");
    }

    #[test]
    fn team_cell_selects_the_current_team() {
        let names = vec!["Team Blue".to_owned(), "Team Red".to_owned()];
        let cell = team_cell(&member(), &names);
        assert!(cell.contains("id=\"team-cell-42\""));
        assert!(cell.contains("hx-put=\"/assign_athlete_team/42\""));
        assert!(cell.contains("<option value=\"Team Red\" selected>Team Red</option>"));
        assert!(cell.contains("<option value=\"Team Blue\">Team Blue</option>"));
    }

    #[test]
    fn role_cell_marks_the_active_role() {
        let cell = role_cell(&member());
        assert!(cell.contains("id=\"role-cell-42\""));
        assert!(cell.contains("hx-put=\"/assign_athlete_team_leader/42\""));
        // TL is active for this member, the others are not.
        let active = cell
            .lines()
            .filter(|l| l.contains("btn-active"))
            .collect::<Vec<_>>();
        assert_eq!(active.len(), 1);
        assert!(active[0].contains(">TL<"));
    }

    #[test]
    fn athlete_rows_render_one_row_per_member() {
        let names = vec!["Team Red".to_owned()];
        let mut second = member();
        second.competitor_id = 43;
        second.name = "Sam Doe".to_owned();
        second.role = ROLE_MEMBER;
        let body = athlete_rows(&[member(), second], &names);
        assert!(body.contains("id=\"athlete-42\""));
        assert!(body.contains("id=\"athlete-43\""));
        assert!(body.contains("Jo Smith"));
        assert!(body.contains("Sam Doe"));
    }

    #[test]
    fn empty_search_results_say_so() {
        let body = athlete_rows(&[], &[]);
        assert!(body.contains("No athletes found."));
    }

    #[test]
    fn rename_row_targets_the_encoded_team() {
        let row = rename_row("Team Red");
        assert!(row.contains("hx-put=\"/rename_team/Team%20Red\""));
        assert!(row.contains("value=\"Team Red\""));
    }
}
