//! Error types and process exit codes.
//!
//! Every fallible layer has its own error enum; `BoxboardError` is the
//! top-level sum type the CLI maps to a process exit code. Exit codes are
//! stable so wrapper scripts and health checks can branch on them.

use serde::Serialize;
use thiserror::Error;

/// Process exit codes.
pub struct ExitCode;

impl ExitCode {
    /// Clean exit.
    pub const SUCCESS: i32 = 0;
    /// Generic runtime failure.
    pub const ERROR: i32 = 1;
    /// Invalid configuration or asset document.
    pub const CONFIG_ERROR: i32 = 2;
    /// Filesystem failure.
    pub const IO_ERROR: i32 = 3;
    /// The Games API was unreachable or returned garbage.
    pub const UPSTREAM_ERROR: i32 = 4;
    /// Invalid command-line usage.
    pub const USAGE_ERROR: i32 = 64;
    /// Interrupted by SIGINT.
    pub const INTERRUPTED: i32 = 130;
    /// Terminated by SIGTERM.
    pub const TERMINATED: i32 = 143;
}

/// How bad a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious but usable.
    Warning,
    /// The document must not ship.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding from asset validation, addressed by a dotted path
/// into the document (`content[1]`, `daisyui.themes[0]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path to the offending field.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// Whether this finding blocks use of the document.
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.path)
    }
}

/// Errors from loading, parsing, or validating build-asset documents.
#[derive(Debug, Error)]
pub enum AssetsError {
    #[error("asset file not found: {path}")]
    MissingFile { path: String },

    #[error("unsupported asset format for {path}: .{extension}")]
    UnsupportedFormat { path: String, extension: String },

    #[error("asset file too large: {path} is {size} bytes (max {max})")]
    FileTooLarge { path: String, size: u64, max: u64 },

    #[error("parse error in {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("invalid document structure in {path}: {message}")]
    Schema { path: String, message: String },

    #[error("{path} failed validation with {} error(s)", errors.len())]
    ValidationFailed {
        path: String,
        errors: Vec<ValidationIssue>,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from roster CSV ingestion.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster file {file} line {line}: expected at least {expected} columns, got {got}")]
    MissingColumns {
        file: String,
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("roster file {file} line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("failed to read roster file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors talking to the CrossFit Games API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {message}")]
    Client { message: String },

    #[error("leaderboard request failed for division {division}: {message}")]
    Request { division: u16, message: String },

    #[error("leaderboard request for division {division} returned HTTP {status}")]
    Status { division: u16, status: u16 },

    #[error("could not decode leaderboard page for division {division}: {message}")]
    Decode { division: u16, message: String },

    #[error("leaderboard request for division {division} timed out after {seconds}s")]
    Timeout { division: u16, seconds: u64 },
}

/// Errors starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server task failed: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error type returned by command dispatch.
#[derive(Debug, Error)]
pub enum BoxboardError {
    #[error(transparent)]
    Assets(#[from] AssetsError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoxboardError {
    /// Maps the error to its process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Assets(_) | Self::Roster(_) => ExitCode::CONFIG_ERROR,
            Self::Fetch(_) => ExitCode::UPSTREAM_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Server(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BoxboardError>;
