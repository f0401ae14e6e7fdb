//! Clap derive structs for the `boxboard` command line.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Affiliate leaderboard server for the `CrossFit` Open.
#[derive(Parser, Debug)]
#[command(name = "boxboard", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "BOXBOARD_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(
        long,
        default_value = "human",
        global = true,
        env = "BOXBOARD_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the leaderboard web server.
    Serve(ServeArgs),

    /// Pull standings once and print a summary without serving.
    Refresh(RefreshArgs),

    /// Inspect, compare, or emit the Tailwind build configuration.
    Assets(AssetsCommand),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Serve / Refresh
// ============================================================================

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address as `host:port`.
    #[arg(short, long, env = "BOXBOARD_BIND")]
    pub bind: Option<String>,

    /// Competition year to track.
    #[arg(long, env = "BOXBOARD_YEAR")]
    pub year: Option<u16>,

    /// Affiliate id to track.
    #[arg(long, env = "BOXBOARD_AFFILIATE_ID")]
    pub affiliate_id: Option<i64>,

    /// Directory holding the roster CSV files.
    #[arg(long, env = "BOXBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the bundled static assets.
    #[arg(long, env = "BOXBOARD_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Expose Prometheus metrics on this localhost port.
    #[arg(long, env = "BOXBOARD_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Pull standings once before accepting requests.
    #[arg(long)]
    pub refresh_on_start: bool,
}

/// Arguments for `refresh`.
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Competition year to pull.
    #[arg(long, env = "BOXBOARD_YEAR")]
    pub year: Option<u16>,

    /// Affiliate id to pull.
    #[arg(long, env = "BOXBOARD_AFFILIATE_ID")]
    pub affiliate_id: Option<i64>,

    /// Directory holding the roster CSV files.
    #[arg(long, env = "BOXBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Assets Command
// ============================================================================

/// Build-configuration tooling.
#[derive(Args, Debug)]
pub struct AssetsCommand {
    /// Assets subcommand.
    #[command(subcommand)]
    pub subcommand: AssetsSubcommand,
}

/// Assets subcommands.
#[derive(Subcommand, Debug)]
pub enum AssetsSubcommand {
    /// Validate build configuration documents.
    Check(AssetsCheckArgs),

    /// Compare two build configuration documents.
    Diff(AssetsDiffArgs),

    /// Print the canonical build configuration.
    Emit(AssetsEmitArgs),
}

/// Arguments for `assets check`.
#[derive(Args, Debug)]
pub struct AssetsCheckArgs {
    /// Documents to check (`.js`, `.cjs`, `.json`, `.yaml`).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `assets diff`.
#[derive(Args, Debug)]
pub struct AssetsDiffArgs {
    /// Baseline document.
    pub left: PathBuf,

    /// Document to compare against the baseline.
    pub right: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `assets emit`.
#[derive(Args, Debug)]
pub struct AssetsEmitArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Document format to emit.
    #[arg(short, long, default_value = "js")]
    pub format: EmitFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Document format for `assets emit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmitFormat {
    /// `tailwind.config.js` module source.
    #[default]
    Js,
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_parses_with_overrides() {
        let cli = Cli::try_parse_from([
            "boxboard",
            "serve",
            "--bind",
            "127.0.0.1:9000",
            "--year",
            "2025",
            "--affiliate-id",
            "31316",
        ]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_serve_defaults_leave_overrides_unset() {
        let cli = Cli::try_parse_from(["boxboard", "serve"]).unwrap();
        if let Commands::Serve(args) = cli.command {
            assert!(args.bind.is_none());
            assert!(args.metrics_port.is_none());
            assert!(!args.refresh_on_start);
            return;
        }
        panic!("Expected ServeArgs");
    }

    #[test]
    fn test_refresh_default_format_is_human() {
        let cli = Cli::try_parse_from(["boxboard", "refresh"]).unwrap();
        if let Commands::Refresh(args) = cli.command {
            assert_eq!(args.format, OutputFormat::Human);
            return;
        }
        panic!("Expected RefreshArgs");
    }

    #[test]
    fn test_assets_check_requires_files() {
        let result = Cli::try_parse_from(["boxboard", "assets", "check"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_assets_check_accepts_strict() {
        let cli = Cli::try_parse_from(["boxboard", "assets", "check", "--strict", "a.js"]).unwrap();
        if let Commands::Assets(cmd) = cli.command {
            if let AssetsSubcommand::Check(args) = cmd.subcommand {
                assert!(args.strict);
                assert_eq!(args.files.len(), 1);
                return;
            }
        }
        panic!("Expected AssetsCheckArgs");
    }

    #[test]
    fn test_assets_diff_takes_two_files() {
        let result = Cli::try_parse_from(["boxboard", "assets", "diff", "a.js"]);
        assert!(result.is_err(), "Expected error for missing right file");

        let cli = Cli::try_parse_from(["boxboard", "assets", "diff", "a.js", "b.js"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_assets_emit_formats_parse() {
        for format in ["js", "json", "yaml"] {
            let cli = Cli::try_parse_from(["boxboard", "assets", "emit", "--format", format]);
            assert!(cli.is_ok(), "Failed to parse format={format}");
        }
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["boxboard", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["boxboard", "--color", variant, "version"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_log_format_parses() {
        for variant in ["human", "json"] {
            let cli = Cli::try_parse_from(["boxboard", "--log-format", variant, "version"]);
            assert!(cli.is_ok(), "Failed to parse log-format={variant}");
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["boxboard", "-vvv", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["boxboard", "--quiet", "version"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_help_output() {
        let result = Cli::try_parse_from(["boxboard", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let result = Cli::try_parse_from(["boxboard", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
