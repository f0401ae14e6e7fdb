//! Build-configuration validation.
//!
//! Validation never stops at the first problem: every finding is collected
//! so one `assets check` run shows the whole picture. Errors make the
//! document unusable; warnings flag drift that is probably unintended but
//! still builds.

use glob::Pattern;

use crate::assets::schema::{BuildConfig, DAISYUI_PLUGIN};
use crate::error::{Severity, ValidationIssue};

/// Theme names shipped with daisyUI v4. Anything else is a typo or a
/// custom theme, either way worth a warning.
pub const KNOWN_DAISYUI_THEMES: [&str; 32] = [
    "light",
    "dark",
    "cupcake",
    "bumblebee",
    "emerald",
    "corporate",
    "synthwave",
    "retro",
    "cyberpunk",
    "valentine",
    "halloween",
    "garden",
    "forest",
    "aqua",
    "lofi",
    "pastel",
    "fantasy",
    "wireframe",
    "black",
    "luxury",
    "dracula",
    "cmyk",
    "autumn",
    "business",
    "acid",
    "lemonade",
    "night",
    "coffee",
    "winter",
    "dim",
    "nord",
    "sunset",
];

/// Maximum edit distance for a "did you mean" theme suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// Outcome of validating one document.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Whether the report blocks use of the document. In strict mode
    /// warnings block too.
    #[must_use]
    pub fn is_blocking(&self, strict: bool) -> bool {
        self.has_errors() || (strict && !self.issues.is_empty())
    }

    /// The error-severity findings, cloned out for error reporting.
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .cloned()
            .collect()
    }
}

/// Validates a build configuration, collecting every finding.
#[must_use]
pub fn validate(config: &BuildConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_content(config, &mut report);
    check_plugins(config, &mut report);
    check_daisyui(config, &mut report);
    report
}

fn check_content(config: &BuildConfig, report: &mut ValidationReport) {
    if config.content.is_empty() {
        report.issues.push(ValidationIssue::error(
            "content",
            "content globs must not be empty; Tailwind would emit no utilities",
        ));
        return;
    }
    for (i, raw) in config.content.iter().enumerate() {
        let path = format!("content[{i}]");
        if raw.trim().is_empty() {
            report
                .issues
                .push(ValidationIssue::error(path, "blank content glob"));
            continue;
        }
        if let Err(e) = Pattern::new(raw) {
            report.issues.push(ValidationIssue::error(
                path,
                format!("glob does not compile: {}", e.msg),
            ));
            continue;
        }
        if let Some(first) = config.content[..i].iter().position(|g| g == raw) {
            report.issues.push(ValidationIssue::warning(
                path,
                format!("duplicate of content[{first}]"),
            ));
        }
    }
}

fn check_plugins(config: &BuildConfig, report: &mut ValidationReport) {
    for (i, plugin) in config.plugins.iter().enumerate() {
        let path = format!("plugins[{i}]");
        if plugin.trim().is_empty() {
            report
                .issues
                .push(ValidationIssue::error(path, "blank plugin name"));
            continue;
        }
        if let Some(first) = config.plugins[..i].iter().position(|p| p == plugin) {
            report.issues.push(ValidationIssue::warning(
                path,
                format!("duplicate of plugins[{first}]"),
            ));
        }
    }
}

fn check_daisyui(config: &BuildConfig, report: &mut ValidationReport) {
    let Some(options) = &config.daisyui else {
        return;
    };
    if !config.has_daisyui_plugin() {
        report.issues.push(ValidationIssue::warning(
            "daisyui",
            format!("daisyui options are set but the {DAISYUI_PLUGIN} plugin is not enabled"),
        ));
    }
    if options.themes.is_empty() {
        report.issues.push(ValidationIssue::warning(
            "daisyui.themes",
            "no themes listed; daisyUI will fall back to its built-in default",
        ));
    }
    for (i, theme) in options.themes.iter().enumerate() {
        let path = format!("daisyui.themes[{i}]");
        if theme.trim().is_empty() {
            report
                .issues
                .push(ValidationIssue::error(path, "blank theme name"));
            continue;
        }
        if let Some(first) = options.themes[..i].iter().position(|t| t == theme) {
            report.issues.push(ValidationIssue::warning(
                path,
                format!("duplicate of daisyui.themes[{first}]"),
            ));
            continue;
        }
        if !KNOWN_DAISYUI_THEMES.contains(&theme.as_str()) {
            let message = match suggest_theme(theme) {
                Some(candidate) => {
                    format!("unknown daisyUI theme \"{theme}\" (did you mean \"{candidate}\"?)")
                }
                None => format!("unknown daisyUI theme \"{theme}\""),
            };
            report.issues.push(ValidationIssue::warning(path, message));
        }
    }
}

/// Nearest known theme within the suggestion distance.
fn suggest_theme(name: &str) -> Option<&'static str> {
    KNOWN_DAISYUI_THEMES
        .iter()
        .map(|known| (strsim::levenshtein(name, known), *known))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, known)| known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::schema::DaisyUiOptions;

    #[test]
    fn canonical_config_is_clean() {
        let report = validate(&BuildConfig::canonical());
        assert!(report.issues.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn empty_content_is_an_error() {
        let config = BuildConfig {
            content: vec![],
            ..BuildConfig::canonical()
        };
        let report = validate(&config);
        assert!(report.has_errors());
        assert_eq!(report.issues[0].path, "content");
    }

    #[test]
    fn bad_glob_is_an_error_at_its_index() {
        let mut config = BuildConfig::canonical();
        config.content.push("./static/[unclosed".into());
        let report = validate(&config);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].path, "content[2]");
        assert!(report.issues[0].message.contains("glob does not compile"));
    }

    #[test]
    fn brace_sets_in_globs_are_accepted() {
        // The canonical globs use `{html,jinja2,js}`; braces are literal
        // characters to the matcher and must not be flagged.
        let report = validate(&BuildConfig::canonical());
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn duplicate_glob_is_a_warning() {
        let mut config = BuildConfig::canonical();
        config.content.push(config.content[0].clone());
        let report = validate(&config);
        assert!(!report.has_errors());
        assert_eq!(report.warning_count(), 1);
        assert!(report.issues[0].message.contains("duplicate of content[0]"));
    }

    #[test]
    fn misspelled_theme_gets_a_suggestion() {
        let mut config = BuildConfig::canonical();
        config.daisyui = Some(DaisyUiOptions {
            themes: vec!["light".into(), "darc".into()],
        });
        let report = validate(&config);
        assert_eq!(report.warning_count(), 1);
        assert!(report.issues[0].message.contains("did you mean \"dark\""));
    }

    #[test]
    fn wildly_unknown_theme_gets_no_suggestion() {
        let mut config = BuildConfig::canonical();
        config.daisyui = Some(DaisyUiOptions {
            themes: vec!["solarized-mega-dark".into()],
        });
        let report = validate(&config);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.issues[0].message.contains("did you mean"));
    }

    #[test]
    fn daisyui_options_without_plugin_warn() {
        let mut config = BuildConfig::canonical();
        config.plugins.clear();
        let report = validate(&config);
        assert!(report.issues.iter().any(|i| i.path == "daisyui"));
    }

    #[test]
    fn blank_plugin_and_theme_are_errors() {
        let mut config = BuildConfig::canonical();
        config.plugins.push("  ".into());
        config.daisyui = Some(DaisyUiOptions {
            themes: vec![String::new()],
        });
        let report = validate(&config);
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn strict_mode_promotes_warnings_to_blocking() {
        let mut config = BuildConfig::canonical();
        config.content.push(config.content[0].clone());
        let report = validate(&config);
        assert!(!report.is_blocking(false));
        assert!(report.is_blocking(true));
    }

    #[test]
    fn suggestion_distance_is_bounded() {
        assert_eq!(suggest_theme("nrod"), Some("nord"));
        assert_eq!(suggest_theme("cyberpnk"), Some("cyberpunk"));
        assert_eq!(suggest_theme("totally-custom"), None);
    }
}
