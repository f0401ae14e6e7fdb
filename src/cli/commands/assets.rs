//! Assets command handlers.
//!
//! Implements `assets check`, `assets diff`, and `assets emit` for the
//! Tailwind build configuration.

use std::path::Path;

use serde_json::json;

use crate::assets::{self, BuildConfig, DiffReport, ValidationReport};
use crate::cli::args::{AssetsCheckArgs, AssetsDiffArgs, AssetsEmitArgs, EmitFormat, OutputFormat};
use crate::error::{AssetsError, BoxboardError};

/// Validate build configuration documents.
///
/// Every file is checked and reported; the first blocking file decides
/// the error so the exit code reflects a configuration problem.
///
/// # Errors
///
/// Returns an assets error when any file fails to parse or validate
/// (with `--strict`, warnings count as failures too).
pub fn check(args: &AssetsCheckArgs) -> Result<(), BoxboardError> {
    let mut first_failure: Option<AssetsError> = None;
    let mut file_reports: Vec<serde_json::Value> = Vec::new();

    for path in &args.files {
        match assets::load(path) {
            Ok(asset) => {
                let report = assets::validate(&asset.config);
                let blocking = report.is_blocking(args.strict);
                match args.format {
                    OutputFormat::Human => print_check_human(path, &asset.config, &report, blocking),
                    OutputFormat::Json => file_reports.push(json!({
                        "file": path.display().to_string(),
                        "format": asset.format.as_str(),
                        "canonical": asset.config.is_canonical(),
                        "errors": report.error_count(),
                        "warnings": report.warning_count(),
                        "issues": report.issues,
                    })),
                }
                if blocking && first_failure.is_none() {
                    let errors = if args.strict {
                        report.issues.clone()
                    } else {
                        report.errors()
                    };
                    first_failure = Some(AssetsError::ValidationFailed {
                        path: path.display().to_string(),
                        errors,
                    });
                }
            }
            Err(e) => {
                match args.format {
                    OutputFormat::Human => {
                        println!("{}: FAIL", path.display());
                        println!("  {e}");
                    }
                    OutputFormat::Json => file_reports.push(json!({
                        "file": path.display().to_string(),
                        "error": e.to_string(),
                    })),
                }
                if first_failure.is_none() {
                    first_failure = Some(e);
                }
            }
        }
    }

    if args.format == OutputFormat::Json {
        let failed = first_failure.is_some();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "files": file_reports,
                "ok": !failed,
            }))?
        );
    }

    match first_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_check_human(
    path: &Path,
    config: &BuildConfig,
    report: &ValidationReport,
    blocking: bool,
) {
    let verdict = if blocking {
        "FAIL"
    } else if config.is_canonical() {
        "ok (canonical)"
    } else if report.issues.is_empty() {
        "ok"
    } else {
        "ok with warnings"
    };
    println!("{}: {verdict}", path.display());
    for issue in &report.issues {
        println!("  {issue}");
    }
}

/// Compare two build configuration documents.
///
/// A successful comparison always exits zero; the report itself is the
/// outcome, even when the documents diverge.
///
/// # Errors
///
/// Returns an assets error when either document fails to load.
pub fn diff(args: &AssetsDiffArgs) -> Result<(), BoxboardError> {
    let left = assets::load(&args.left)?;
    let right = assets::load(&args.right)?;
    let report = assets::diff(&left.config, &right.config);

    match args.format {
        OutputFormat::Human => print_diff_human(&args.left, &args.right, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_diff_human(left: &Path, right: &Path, report: &DiffReport) {
    println!(
        "{} -> {}: {}",
        left.display(),
        right.display(),
        report.drift
    );
    for change in &report.changes {
        let left_value = change.left.as_deref().unwrap_or("<absent>");
        let right_value = change.right.as_deref().unwrap_or("<absent>");
        println!("  {}: {left_value} -> {right_value}", change.path);
    }
}

/// Print or write the canonical build configuration.
///
/// # Errors
///
/// Returns an assets error when serialization fails, or an I/O error
/// when `--out` cannot be written.
pub fn emit(args: &AssetsEmitArgs) -> Result<(), BoxboardError> {
    let config = BuildConfig::canonical();
    let rendered = match args.format {
        EmitFormat::Js => assets::to_js(&config),
        EmitFormat::Json => assets::to_json(&config)?,
        EmitFormat::Yaml => assets::to_yaml(&config)?,
    };

    match &args.out {
        Some(path) => std::fs::write(path, &rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}
