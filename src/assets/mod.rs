//! Frontend build-asset handling.
//!
//! The UI styling is produced by Tailwind with the daisyUI plugin, and the
//! build is driven by a single `tailwind.config.js`. Historically that file
//! was copy-pasted between environments and drifted silently, so this module
//! treats it as a typed document: it can be loaded from JS, JSON, or YAML,
//! validated, diffed against another copy, and re-emitted in one canonical
//! byte form.

pub mod diff;
pub mod emit;
pub mod loader;
pub mod schema;
pub mod validation;

pub use diff::{DiffReport, Drift, diff};
pub use emit::{to_js, to_json, to_yaml};
pub use loader::{LoadedAsset, SourceFormat, load, parse_str};
pub use schema::{BuildConfig, DaisyUiOptions, ThemeConfig};
pub use validation::{ValidationReport, validate};
