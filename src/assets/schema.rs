//! Typed model of the Tailwind build configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Content globs of the canonical configuration, in order.
pub const CANONICAL_CONTENT_GLOBS: [&str; 2] = [
    "./templates/**/*.{html,jinja2,js}",
    "./static/**/*.{html,jinja2,js}",
];

/// The single plugin the canonical configuration enables.
pub const DAISYUI_PLUGIN: &str = "daisyui";

/// Themes of the canonical configuration, in order.
pub const CANONICAL_THEMES: [&str; 2] = ["light", "dark"];

/// The `tailwind.config.js` document, independent of serialized form.
///
/// Field order mirrors the canonical file so serialization round-trips
/// byte-stable. Unknown keys are rejected at parse time: a misspelled key
/// in a build config is silently ignored by Tailwind itself, which is
/// exactly the failure mode this type exists to catch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Globs Tailwind scans for class names.
    #[serde(default)]
    pub content: Vec<String>,
    /// Theme customization; only `extend` is modeled.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Enabled plugins, by package name.
    #[serde(default)]
    pub plugins: Vec<String>,
    /// daisyUI plugin options, present only when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daisyui: Option<DaisyUiOptions>,
}

/// The `theme` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Design-token overrides layered on top of the Tailwind defaults.
    /// Arbitrary nested structure, order-preserving.
    #[serde(default)]
    pub extend: IndexMap<String, serde_json::Value>,
}

/// The `daisyui` options block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaisyUiOptions {
    /// Enabled daisyUI themes. The first entry is the default theme, the
    /// second is what `prefers-color-scheme: dark` switches to.
    #[serde(default)]
    pub themes: Vec<String>,
}

impl BuildConfig {
    /// The one configuration every deployment is expected to carry.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            content: CANONICAL_CONTENT_GLOBS.map(str::to_owned).to_vec(),
            theme: ThemeConfig::default(),
            plugins: vec![DAISYUI_PLUGIN.to_owned()],
            daisyui: Some(DaisyUiOptions {
                themes: CANONICAL_THEMES.map(str::to_owned).to_vec(),
            }),
        }
    }

    /// True when this document equals the canonical configuration.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        *self == Self::canonical()
    }

    /// True when the daisyUI plugin is in the plugin list.
    #[must_use]
    pub fn has_daisyui_plugin(&self) -> bool {
        self.plugins.iter().any(|p| p == DAISYUI_PLUGIN)
    }
}
