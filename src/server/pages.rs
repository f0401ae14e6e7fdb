//! Server-rendered pages and the htmx endpoints backing them.

use axum::Form;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::info;

use crate::games::{self, EVENT_ORDINALS, ingest};
use crate::roster;
use crate::server::html::{self, PageContext};
use crate::server::{ApiError, AppState, api, auth, partials};

fn context(state: &AppState, headers: &HeaderMap, title: &str) -> PageContext {
    PageContext {
        title: title.to_owned(),
        year: state.settings.year,
        affiliate_name: state.settings.affiliate_name.clone(),
        admin: auth::is_admin(state, headers),
    }
}

fn check_ordinal(ordinal: u32) -> Result<(), ApiError> {
    if EVENT_ORDINALS.contains(&ordinal) {
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}

/// Sends non-admins to the login page instead of a bare 401.
fn admin_or_login(state: &AppState, headers: &HeaderMap) -> Option<Redirect> {
    if auth::is_admin(state, headers) {
        None
    } else {
        Some(Redirect::temporary("/login"))
    }
}

async fn updated_line(state: &AppState) -> String {
    state.store.last_refresh().await.map_or_else(
        || "<p class=\"text-sm opacity-60\">No standings yet. Hit Refresh to pull them in.</p>"
            .to_owned(),
        |at| {
            format!(
                "<p class=\"text-sm opacity-60\">Updated {}</p>",
                at.format("%Y-%m-%d %H:%M UTC")
            )
        },
    )
}

fn role_display(code: u8) -> &'static str {
    match roster::role_label(code) {
        "" => "Member",
        label => label,
    }
}

/// `GET /team_scores/{ordinal}` — per-team points for one event plus the
/// season running total.
pub async fn team_scores(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ordinal): Path<u32>,
) -> Result<Html<String>, ApiError> {
    check_ordinal(ordinal)?;
    let rows = state.store.team_scores(ordinal).await;
    let overall: std::collections::HashMap<String, u32> =
        state.store.overall_scores().await.into_iter().collect();

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.team.clone(),
                row.athletes.to_string(),
                row.participation.to_string(),
                row.top3.to_string(),
                row.attendance.to_string(),
                row.judge.to_string(),
                row.side_challenge.to_string(),
                row.spirit.to_string(),
                row.total.to_string(),
                overall.get(&row.team).copied().unwrap_or(0).to_string(),
            ]
        })
        .collect();

    let sections = vec![
        html::event_tabs("/team_scores", state.settings.year, ordinal),
        partials::refresh_button(),
        html::card(
            &format!("Team Scores {}", games::event_name(state.settings.year, ordinal)),
            &html::table(
                &[
                    "Team",
                    "Athletes",
                    "Participation",
                    "Top 3",
                    "Attendance",
                    "Judge",
                    "Side Challenge",
                    "Spirit",
                    "Event Total",
                    "Overall",
                ],
                &table_rows,
            ),
        ),
        updated_line(&state).await,
    ];
    let ctx = context(&state, &headers, "Team Scores");
    Ok(Html(html::page(&ctx, &sections)))
}

/// `GET /leaderboard/{ordinal}` — the podium per gender and age category.
pub async fn leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ordinal): Path<u32>,
) -> Result<Html<String>, ApiError> {
    check_ordinal(ordinal)?;
    let grouped = state.store.leaderboard(ordinal).await;

    let mut sections = vec![html::event_tabs("/leaderboard", state.settings.year, ordinal)];
    if grouped.is_empty() {
        sections.push(updated_line(&state).await);
    }
    for (category, entries) in &grouped {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                vec![
                    e.affiliate_rank.to_string(),
                    e.name.clone(),
                    e.team.clone(),
                    html::scaled_badge(e.affiliate_scaled).to_owned(),
                    e.score_display.clone(),
                ]
            })
            .collect();
        sections.push(html::card(
            category,
            &html::table(&["Rank", "Athlete", "Team", "Division", "Score"], &rows),
        ));
    }
    let ctx = context(&state, &headers, "Leaderboard");
    Ok(Html(html::page(&ctx, &sections)))
}

/// `GET /athlete_scores/{ordinal}` — every score with its points breakdown.
pub async fn athlete_scores(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ordinal): Path<u32>,
) -> Result<Html<String>, ApiError> {
    check_ordinal(ordinal)?;
    let grouped = state.store.athlete_scores(ordinal).await;

    let mut sections = vec![html::event_tabs(
        "/athlete_scores",
        state.settings.year,
        ordinal,
    )];
    if grouped.is_empty() {
        sections.push(updated_line(&state).await);
    }
    for (category, entries) in &grouped {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                vec![
                    e.affiliate_rank.to_string(),
                    e.name.clone(),
                    e.team.clone(),
                    html::scaled_badge(e.affiliate_scaled).to_owned(),
                    e.score_display.clone(),
                    e.points.participation.to_string(),
                    e.points.top3.to_string(),
                    e.points.attendance.to_string(),
                    e.points.judge.to_string(),
                    e.points.side_challenge.to_string(),
                    e.points.spirit.to_string(),
                    e.points.total.to_string(),
                ]
            })
            .collect();
        sections.push(html::card(
            category,
            &html::table(
                &[
                    "Rank",
                    "Athlete",
                    "Team",
                    "Division",
                    "Score",
                    "Participation",
                    "Top 3",
                    "Attendance",
                    "Judge",
                    "Side Challenge",
                    "Spirit",
                    "Total",
                ],
                &rows,
            ),
        ));
    }
    let ctx = context(&state, &headers, "Athlete Scores");
    Ok(Html(html::page(&ctx, &sections)))
}

/// `GET /team_members` — rosters grouped by team.
pub async fn team_members(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let grouped = state.store.teams().await;

    let mut sections = Vec::new();
    if grouped.is_empty() {
        sections.push(updated_line(&state).await);
    }
    for (team, members) in &grouped {
        let rows: Vec<Vec<String>> = members
            .iter()
            .map(|m| vec![m.name.clone(), role_display(m.role).to_owned()])
            .collect();
        sections.push(html::card(
            &format!("{team} ({})", members.len()),
            &html::table(&["Athlete", "Role"], &rows),
        ));
    }
    let ctx = context(&state, &headers, "Teams");
    Ok(Html(html::page(&ctx, &sections)))
}

/// `GET /login` — the admin login form.
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<form class=\"space-y-4 max-w-sm\" hx-post=\"/login\" \
                hx-target=\"#login-alert\" hx-swap=\"outerHTML\">"
        .to_owned());
    lines.push("  <div id=\"login-alert\"></div>".to_owned());
    lines.push(
        "  <input class=\"input input-bordered w-full\" type=\"text\" name=\"username\" \
         placeholder=\"Username\" autocomplete=\"username\" required>"
            .to_owned(),
    );
    lines.push(
        "  <input class=\"input input-bordered w-full\" type=\"password\" name=\"password\" \
         placeholder=\"Password\" autocomplete=\"current-password\" required>"
            .to_owned(),
    );
    lines.push("  <button class=\"btn btn-primary w-full\" type=\"submit\">Log in</button>".to_owned());
    lines.push("</form>".to_owned());

    let sections = vec![html::card("Admin Login", &lines.join("\n"))];
    let ctx = context(&state, &headers, "Login");
    Html(html::page(&ctx, &sections))
}

/// `GET /refresh` — pulls fresh standings, then lands on the first event.
///
/// When a refresh is already running this just redirects; the running one
/// will finish on its own.
pub async fn refresh_and_redirect(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let Some(_slot) = api::RefreshSlot::acquire(&state.refreshing) else {
        return Ok(Redirect::temporary("/team_scores/1"));
    };
    ingest::refresh(
        &state.store,
        state.source.as_ref(),
        &state.settings.data_dir,
        state.settings.year,
        state.settings.affiliate_id,
    )
    .await?;
    Ok(Redirect::temporary("/team_scores/1"))
}

/// `GET /ui/refresh_button` — the refresh control as a fragment.
pub async fn refresh_button() -> Html<String> {
    Html(partials::refresh_button())
}

/// `GET /assign_teams` — admin page for moving athletes between teams.
pub async fn assign_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(redirect) = admin_or_login(&state, &headers) {
        return Ok(redirect.into_response());
    }
    let members = state.store.search_athletes("").await;
    let team_names = state.store.team_names().await;

    let mut lines: Vec<String> = Vec::new();
    lines.push(
        "<input class=\"input input-bordered w-full max-w-xs\" type=\"search\" name=\"name\" \
         placeholder=\"Search athletes\" hx-post=\"/athlete_teams\" \
         hx-trigger=\"input changed delay:300ms, search\" hx-target=\"#athlete-rows\">"
            .to_owned(),
    );
    lines.push("<div class=\"overflow-x-auto\">".to_owned());
    lines.push("<table class=\"table table-zebra table-sm\">".to_owned());
    lines.push("  <thead><tr><th>Athlete</th><th>Team</th><th>Role</th></tr></thead>".to_owned());
    lines.push("  <tbody id=\"athlete-rows\">".to_owned());
    lines.push(partials::athlete_rows(&members, &team_names));
    lines.push("  </tbody>".to_owned());
    lines.push("</table>".to_owned());
    lines.push("</div>".to_owned());

    let sections = vec![html::card("Assign Teams", &lines.join("\n"))];
    let ctx = context(&state, &headers, "Assign Teams");
    Ok(Html(html::page(&ctx, &sections)).into_response())
}

/// `GET /rename_teams` — admin page for renaming whole teams.
pub async fn rename_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(redirect) = admin_or_login(&state, &headers) {
        return Ok(redirect.into_response());
    }
    let team_names = state.store.team_names().await;

    let mut lines: Vec<String> = Vec::new();
    lines.push("<div class=\"overflow-x-auto\">".to_owned());
    lines.push("<table class=\"table table-zebra table-sm\">".to_owned());
    lines.push("  <thead><tr><th>Team</th><th>New name</th></tr></thead>".to_owned());
    lines.push("  <tbody>".to_owned());
    for team in &team_names {
        lines.push(partials::rename_row(team));
    }
    lines.push("  </tbody>".to_owned());
    lines.push("</table>".to_owned());
    lines.push("</div>".to_owned());

    let sections = vec![html::card("Rename Teams", &lines.join("\n"))];
    let ctx = context(&state, &headers, "Rename Teams");
    Ok(Html(html::page(&ctx, &sections)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub name: String,
}

/// `POST /athlete_teams` — live search rows for the assignment table.
pub async fn athlete_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, ApiError> {
    auth::require_admin(&state, &headers)?;
    let members = state.store.search_athletes(form.name.trim()).await;
    let team_names = state.store.team_names().await;
    Ok(Html(partials::athlete_rows(&members, &team_names)))
}

#[derive(Debug, Deserialize)]
pub struct TeamForm {
    pub team: String,
}

/// `PUT /assign_athlete_team/{competitor_id}` — swaps the team cell.
pub async fn assign_athlete_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(competitor_id): Path<i64>,
    Form(form): Form<TeamForm>,
) -> Result<Html<String>, ApiError> {
    auth::require_admin(&state, &headers)?;
    state
        .store
        .assign_team(competitor_id, form.team.trim())
        .await
        .ok_or(ApiError::NotFound)?;
    let member = state
        .store
        .member(competitor_id)
        .await
        .ok_or(ApiError::NotFound)?;
    info!(competitor_id, team = %member.team, "athlete reassigned");
    let team_names = state.store.team_names().await;
    Ok(Html(partials::team_cell(&member, &team_names)))
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub role: String,
}

/// `PUT /assign_athlete_team_leader/{competitor_id}` — swaps the role cell.
pub async fn assign_athlete_team_leader(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(competitor_id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> Result<Html<String>, ApiError> {
    auth::require_admin(&state, &headers)?;
    let code = roster::role_code(&form.role);
    state
        .store
        .assign_role(competitor_id, code)
        .await
        .ok_or(ApiError::NotFound)?;
    let member = state
        .store
        .member(competitor_id)
        .await
        .ok_or(ApiError::NotFound)?;
    info!(competitor_id, role = role_display(code), "role updated");
    Ok(Html(partials::role_cell(&member)))
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    pub name: String,
}

/// `PUT /rename_team/{team}` — renames a team and swaps its row.
pub async fn rename_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
    Form(form): Form<RenameForm>,
) -> Result<Html<String>, ApiError> {
    auth::require_admin(&state, &headers)?;
    let new_name = form.name.trim();
    if new_name.is_empty() || new_name == team {
        return Ok(Html(partials::rename_row(&team)));
    }
    let moved = state.store.rename_team(&team, new_name).await;
    info!(from = %team, to = %new_name, moved, "team renamed");
    Ok(Html(partials::rename_row(new_name)))
}
