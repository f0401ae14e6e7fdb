//! Structured logging setup on top of `tracing-subscriber`.
//!
//! Verbosity comes from repeated `-v` flags; the `BOXBOARD_LOG` environment
//! variable accepts a full `EnvFilter` directive string and wins over the
//! flag-derived level when set. Logs go to stderr so stdout stays clean for
//! command output.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Human,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Maps `-v` occurrences to a default filter directive.
fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "boxboard=warn",
        1 => "boxboard=info",
        2 => "boxboard=debug",
        _ => "boxboard=trace",
    }
}

/// Initializes the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops. `use_color`
/// is the tri-state from `--color`: `None` means auto-detect from the
/// terminal and `NO_COLOR`.
pub fn init_logging(format: LogFormat, verbosity: u8, use_color: Option<bool>) {
    let filter = EnvFilter::try_from_env("BOXBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let color = use_color.unwrap_or_else(|| {
        std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false);

    let result = match format {
        LogFormat::Human => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // Already initialized (tests call this repeatedly).
    drop(result);
}
