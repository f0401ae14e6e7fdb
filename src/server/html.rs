//! HTML assembly for the server-rendered pages.
//!
//! Pages are plain strings built section by section. Styling leans on
//! Tailwind utility classes and daisyUI components served from
//! `/static/app.css`; interactivity comes from htmx. Every dynamic value
//! goes through [`escape`] before it reaches the page.

use crate::games::EVENT_ORDINALS;

/// Context shared by every full page render.
pub struct PageContext {
    pub title: String,
    pub year: u16,
    pub affiliate_name: String,
    pub admin: bool,
}

/// Escapes text for safe interpolation into HTML bodies and attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wraps rendered sections in the full document shell.
#[must_use]
pub fn page(ctx: &PageContext, sections: &[String]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<!doctype html>".to_owned());
    lines.push("<html lang=\"en\" data-theme=\"light\">".to_owned());
    lines.push("<head>".to_owned());
    lines.push("  <meta charset=\"utf-8\">".to_owned());
    lines.push(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_owned(),
    );
    lines.push(format!("  <title>{}</title>", escape(&ctx.title)));
    lines.push("  <link rel=\"stylesheet\" href=\"/static/app.css\">".to_owned());
    lines.push("  <script src=\"/static/htmx.min.js\" defer></script>".to_owned());
    lines.push("</head>".to_owned());
    lines.push("<body class=\"min-h-screen bg-base-200\">".to_owned());
    lines.push(navbar(ctx));
    lines.push("<main class=\"container mx-auto px-4 py-6 space-y-6\">".to_owned());
    for section in sections {
        lines.push(section.clone());
    }
    lines.push("</main>".to_owned());
    lines.push("</body>".to_owned());
    lines.push("</html>".to_owned());
    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}

fn navbar(ctx: &PageContext) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<nav class=\"navbar bg-base-100 shadow-sm\">".to_owned());
    lines.push("  <div class=\"navbar-start\">".to_owned());
    lines.push(format!(
        "    <a class=\"btn btn-ghost text-xl\" href=\"/team_scores/1\">{} Open {}</a>",
        escape(&ctx.affiliate_name),
        ctx.year
    ));
    lines.push("  </div>".to_owned());
    lines.push("  <div class=\"navbar-end gap-2\">".to_owned());
    lines.push(nav_link("/team_scores/1", "Team Scores"));
    lines.push(nav_link("/leaderboard/1", "Leaderboard"));
    lines.push(nav_link("/athlete_scores/1", "Athlete Scores"));
    lines.push(nav_link("/team_members", "Teams"));
    if ctx.admin {
        lines.push(nav_link("/assign_teams", "Assign Teams"));
        lines.push(nav_link("/rename_teams", "Rename Teams"));
        lines.push(nav_link("/logout", "Logout"));
    } else {
        lines.push(nav_link("/login", "Login"));
    }
    lines.push("  </div>".to_owned());
    lines.push("</nav>".to_owned());
    lines.join("\n")
}

fn nav_link(href: &str, label: &str) -> String {
    format!("    <a class=\"btn btn-ghost btn-sm\" href=\"{href}\">{label}</a>")
}

/// Tab strip for switching between event ordinals on a scores page.
#[must_use]
pub fn event_tabs(base_path: &str, year: u16, active: u32) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<div role=\"tablist\" class=\"tabs tabs-boxed w-fit\">".to_owned());
    for ordinal in EVENT_ORDINALS {
        let class = if ordinal == active {
            "tab tab-active"
        } else {
            "tab"
        };
        lines.push(format!(
            "  <a role=\"tab\" class=\"{class}\" href=\"{base_path}/{ordinal}\">{}</a>",
            crate::games::event_name(year, ordinal)
        ));
    }
    lines.push("</div>".to_owned());
    lines.join("\n")
}

/// A daisyUI card with a heading and arbitrary body markup.
#[must_use]
pub fn card(title: &str, body: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<div class=\"card bg-base-100 shadow-sm\">".to_owned());
    lines.push("  <div class=\"card-body\">".to_owned());
    lines.push(format!(
        "    <h2 class=\"card-title\">{}</h2>",
        escape(title)
    ));
    lines.push(body.to_owned());
    lines.push("  </div>".to_owned());
    lines.push("</div>".to_owned());
    lines.join("\n")
}

/// Standard zebra table. Every cell is escaped here, so callers pass raw
/// values; markup-bearing cells belong in [`crate::server::partials`] instead.
#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("<div class=\"overflow-x-auto\">".to_owned());
    lines.push("<table class=\"table table-zebra table-sm\">".to_owned());
    lines.push("  <thead>".to_owned());
    lines.push("    <tr>".to_owned());
    for header in headers {
        lines.push(format!("      <th>{}</th>", escape(header)));
    }
    lines.push("    </tr>".to_owned());
    lines.push("  </thead>".to_owned());
    lines.push("  <tbody>".to_owned());
    for row in rows {
        lines.push("    <tr>".to_owned());
        for cell in row {
            lines.push(format!("      <td>{}</td>", escape(cell)));
        }
        lines.push("    </tr>".to_owned());
    }
    lines.push("  </tbody>".to_owned());
    lines.push("</table>".to_owned());
    lines.push("</div>".to_owned());
    lines.join("\n")
}

/// Small badge for the scaled / rx distinction.
#[must_use]
pub fn scaled_badge(scaled: bool) -> &'static str {
    if scaled { "Scaled" } else { "Rx" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PageContext {
        PageContext {
            title: "Team Scores".to_owned(),
            year: 2025,
            affiliate_name: "CrossFit MonkeyFlag".to_owned(),
            admin: false,
        }
    }

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn page_contains_shell_and_sections() {
        let doc = page(&ctx(), &["<p>hello</p>".to_owned()]);
        assert!(doc.starts_with("<!doctype html>"));
        assert!(doc.contains("<p>hello</p>"));
        assert!(doc.contains("/static/app.css"));
        assert!(doc.contains("htmx.min.js"));
        assert!(doc.ends_with("</html>\n"));
    }

    #[test]
    fn navbar_switches_on_admin() {
        let guest = page(&ctx(), &[]);
        assert!(guest.contains("/login"));
        assert!(!guest.contains("/assign_teams"));

        let mut admin_ctx = ctx();
        admin_ctx.admin = true;
        let admin = page(&admin_ctx, &[]);
        assert!(admin.contains("/assign_teams"));
        assert!(admin.contains("/logout"));
        assert!(!admin.contains(">Login<"));
    }

    #[test]
    fn event_tabs_mark_the_active_ordinal() {
        let tabs = event_tabs("/team_scores", 2025, 2);
        assert!(tabs.contains("href=\"/team_scores/1\">25.1<"));
        assert!(tabs.contains("tab tab-active\" href=\"/team_scores/2\""));
        assert!(tabs.contains("href=\"/team_scores/3\">25.3<"));
    }

    #[test]
    fn table_escapes_cells() {
        let out = table(&["Name"], &[vec!["<script>".to_owned()]]);
        assert!(out.contains("<td>&lt;script&gt;</td>"));
        assert!(out.contains("<th>Name</th>"));
    }
}
