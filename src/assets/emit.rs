//! Canonical serialization of build configurations.
//!
//! `to_js` is the authoritative output: re-emitting the canonical document
//! reproduces the checked-in `tailwind.config.js` byte for byte, so
//! "normalize a drifted copy" is just load + emit. JSON and YAML output
//! exist for tooling that wants a data form instead of the JS artifact.

use serde_json::Value;

use crate::assets::schema::BuildConfig;
use crate::error::AssetsError;

/// Renders the document in its native `tailwind.config.js` form.
#[must_use]
pub fn to_js(config: &BuildConfig) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("/** @type {import('tailwindcss').Config} */".to_owned());
    lines.push("module.exports = {".to_owned());

    let globs = config
        .content
        .iter()
        .map(|g| js_string(g))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("  content: [{globs}],"));

    lines.push("  theme: {".to_owned());
    if config.theme.extend.is_empty() {
        lines.push("    extend: {},".to_owned());
    } else {
        lines.push("    extend: {".to_owned());
        for (key, value) in &config.theme.extend {
            lines.push(format!("      {}: {},", js_key(key), js_value(value, 6)));
        }
        lines.push("    },".to_owned());
    }
    lines.push("  },".to_owned());

    let plugins = config
        .plugins
        .iter()
        .map(|p| format!("require({})", js_string(p)))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("  plugins: [{plugins}],"));

    if let Some(daisyui) = &config.daisyui {
        let themes = daisyui
            .themes
            .iter()
            .map(|t| js_string(t))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push("  daisyui: {".to_owned());
        lines.push(format!("    themes: [{themes}]"));
        lines.push("  },".to_owned());
    }

    lines.push("};".to_owned());
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Renders the document as pretty-printed JSON.
pub fn to_json(config: &BuildConfig) -> Result<String, AssetsError> {
    serde_json::to_string_pretty(config)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| AssetsError::Schema {
            path: "<emit>".to_owned(),
            message: e.to_string(),
        })
}

/// Renders the document as YAML.
pub fn to_yaml(config: &BuildConfig) -> Result<String, AssetsError> {
    serde_yaml::to_string(config).map_err(|e| AssetsError::Schema {
        path: "<emit>".to_owned(),
        message: e.to_string(),
    })
}

/// Double-quoted JS string literal.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Object key, unquoted when identifier-safe.
fn js_key(key: &str) -> String {
    let mut chars = key.chars();
    let ident_safe = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if ident_safe {
        key.to_owned()
    } else {
        js_string(key)
    }
}

/// Arbitrary nested value at the given indent depth. Arrays render inline,
/// objects one entry per line.
fn js_value(value: &Value, indent: usize) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => js_string(s),
        Value::Array(items) => {
            let inner = items
                .iter()
                .map(|v| js_value(v, indent))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{inner}]")
        }
        Value::Object(map) => {
            if map.is_empty() {
                return "{}".to_owned();
            }
            let pad = " ".repeat(indent + 2);
            let close = " ".repeat(indent);
            let mut out = String::from("{\n");
            for (key, v) in map {
                out.push_str(&format!("{pad}{}: {},\n", js_key(key), js_value(v, indent + 2)));
            }
            out.push_str(&format!("{close}}}"));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::loader::{SourceFormat, parse_str};
    use crate::assets::schema::DaisyUiOptions;
    use proptest::prelude::*;

    const CANONICAL_BYTES: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: ["./templates/**/*.{html,jinja2,js}", "./static/**/*.{html,jinja2,js}"],
  theme: {
    extend: {},
  },
  plugins: [require("daisyui")],
  daisyui: {
    themes: ["light", "dark"]
  },
};
"#;

    #[test]
    fn canonical_emission_is_byte_exact() {
        assert_eq!(to_js(&BuildConfig::canonical()), CANONICAL_BYTES);
    }

    #[test]
    fn emission_round_trips_through_the_js_reader() {
        let config = BuildConfig::canonical();
        let parsed = parse_str(&to_js(&config), SourceFormat::Js, "emitted.js").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn double_emission_is_idempotent() {
        let first = to_js(&BuildConfig::canonical());
        let parsed = parse_str(&first, SourceFormat::Js, "emitted.js").unwrap();
        assert_eq!(to_js(&parsed), first);
    }

    #[test]
    fn nested_extend_renders_and_round_trips() {
        let mut config = BuildConfig::canonical();
        config.theme.extend.insert(
            "colors".into(),
            serde_json::json!({"primary": "#4b6bfb", "accent-2": "#f000b8"}),
        );
        config
            .theme
            .extend
            .insert("screens".into(), serde_json::json!(["sm", "md"]));
        let rendered = to_js(&config);
        assert!(rendered.contains("    extend: {\n"));
        assert!(rendered.contains("      colors: {\n"));
        assert!(rendered.contains("\"accent-2\": \"#f000b8\","));
        assert!(rendered.contains("      screens: [\"sm\", \"md\"],"));
        let parsed = parse_str(&rendered, SourceFormat::Js, "emitted.js").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn document_without_daisyui_omits_the_block() {
        let config = BuildConfig {
            daisyui: None,
            ..BuildConfig::canonical()
        };
        let rendered = to_js(&config);
        assert!(!rendered.contains("daisyui"));
        let parsed = parse_str(&rendered, SourceFormat::Js, "emitted.js").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn json_and_yaml_forms_parse_back() {
        let config = BuildConfig::canonical();
        let json = to_json(&config).unwrap();
        assert_eq!(
            parse_str(&json, SourceFormat::Json, "t.json").unwrap(),
            config
        );
        let yaml = to_yaml(&config).unwrap();
        assert_eq!(
            parse_str(&yaml, SourceFormat::Yaml, "t.yaml").unwrap(),
            config
        );
    }

    #[test]
    fn keys_needing_quotes_are_quoted() {
        assert_eq!(js_key("colors"), "colors");
        assert_eq!(js_key("accent-2"), "\"accent-2\"");
        assert_eq!(js_key("128"), "\"128\"");
        assert_eq!(js_key("$grid"), "$grid");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(js_string("a\"b"), r#""a\"b""#);
        assert_eq!(js_string("a\\b"), r#""a\\b""#);
    }

    fn glob_like() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-zA-Z0-9./*{},_ -]{1,30}").unwrap()
    }

    fn extend_value() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            glob_like().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            any::<bool>().prop_map(serde_json::Value::from),
        ]
    }

    proptest! {
        // Emit then re-parse must reproduce the document exactly, whatever
        // the field contents.
        #[test]
        fn js_round_trip_holds(
            content in proptest::collection::vec(glob_like(), 0..4),
            plugins in proptest::collection::vec(glob_like(), 0..3),
            themes in proptest::option::of(proptest::collection::vec(glob_like(), 0..4)),
            extend in proptest::collection::btree_map(glob_like(), extend_value(), 0..4),
        ) {
            let config = BuildConfig {
                content,
                theme: crate::assets::schema::ThemeConfig {
                    extend: extend.into_iter().collect(),
                },
                plugins,
                daisyui: themes.map(|themes| DaisyUiOptions { themes }),
            };
            let rendered = to_js(&config);
            let parsed = parse_str(&rendered, SourceFormat::Js, "prop.js").unwrap();
            prop_assert_eq!(parsed, config);
        }
    }
}
