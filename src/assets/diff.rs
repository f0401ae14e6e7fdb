//! Structural comparison of two build configurations.
//!
//! The interesting case is the historical one: two copies of the config
//! that agree on everything except the content globs (one scanned `.js`
//! files, one did not). That gets its own drift class so callers can
//! report "same config, different scan scope" instead of a generic
//! mismatch.

use serde::Serialize;

use crate::assets::schema::BuildConfig;

/// How far apart two documents are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Drift {
    /// Structurally equal.
    Identical,
    /// Equal except for the content globs.
    ContentGlobsOnly,
    /// Differences beyond the content globs.
    Divergent,
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identical => write!(f, "identical"),
            Self::ContentGlobsOnly => write!(f, "content globs only"),
            Self::Divergent => write!(f, "divergent"),
        }
    }
}

/// One field-level difference. `None` means the side has no value at that
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub path: String,
    pub left: Option<String>,
    pub right: Option<String>,
}

/// Full comparison result.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub drift: Drift,
    pub changes: Vec<FieldDiff>,
}

impl DiffReport {
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        matches!(self.drift, Drift::Identical)
    }
}

/// Compares two documents field by field.
#[must_use]
pub fn diff(left: &BuildConfig, right: &BuildConfig) -> DiffReport {
    let mut changes = Vec::new();

    diff_lists("content", &left.content, &right.content, &mut changes);

    if left.theme.extend != right.theme.extend {
        changes.push(FieldDiff {
            path: "theme.extend".to_owned(),
            left: json_compact(&left.theme.extend),
            right: json_compact(&right.theme.extend),
        });
    }

    diff_lists("plugins", &left.plugins, &right.plugins, &mut changes);

    match (&left.daisyui, &right.daisyui) {
        (None, None) => {}
        (Some(l), Some(r)) => {
            diff_lists("daisyui.themes", &l.themes, &r.themes, &mut changes);
        }
        (l, r) => changes.push(FieldDiff {
            path: "daisyui".to_owned(),
            left: l.as_ref().map(|o| format!("themes {:?}", o.themes)),
            right: r.as_ref().map(|o| format!("themes {:?}", o.themes)),
        }),
    }

    let drift = classify(&changes);
    DiffReport { drift, changes }
}

fn classify(changes: &[FieldDiff]) -> Drift {
    if changes.is_empty() {
        Drift::Identical
    } else if changes.iter().all(|c| c.path.starts_with("content")) {
        Drift::ContentGlobsOnly
    } else {
        Drift::Divergent
    }
}

fn diff_lists(path: &str, left: &[String], right: &[String], changes: &mut Vec<FieldDiff>) {
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i);
        let r = right.get(i);
        if l != r {
            changes.push(FieldDiff {
                path: format!("{path}[{i}]"),
                left: l.cloned(),
                right: r.cloned(),
            });
        }
    }
}

fn json_compact<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}
