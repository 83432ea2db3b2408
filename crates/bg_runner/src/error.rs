//! Error types for the CLI, tournament, and sweep drivers.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`RunnerError`].
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Top-level error type for everything outside `bg_core`.
///
/// Mirrors the core's split: configuration errors are reported to the user
/// and exit non-zero; resource errors are reported at the boundary and never
/// reach the engine. Engine-internal anomalies stay inside `bg_core` and
/// never surface here.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A battle-core construction error (invalid strategy, unknown scenario, N <= 0, ...).
    #[error(transparent)]
    Battle(#[from] bg_core::error::BattleError),

    /// A save file, config file, or output directory could not be read or written.
    #[error("cannot access '{path}': {source}")]
    Resource {
        /// Path that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config or sweep-table JSON payload failed to (de)serialize.
    #[error("malformed JSON in '{path}': {message}")]
    JsonParseError {
        /// Path to the offending file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A config RON payload failed to (de)serialize.
    #[error("malformed config '{path}': {message}")]
    ConfigParseError {
        /// Path to the offending file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A CLI argument was syntactically valid but semantically out of range.
    #[error("invalid argument {name}: {message}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: String,
        /// Human-readable explanation.
        message: String,
    },
}

impl RunnerError {
    /// Wrap an I/O error with the path that produced it.
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Resource { path: path.into(), source }
    }

    /// The process exit code this error should produce (see `SPEC_FULL.md` §6).
    ///
    /// Every variant here is a configuration or resource error; engine-internal
    /// anomalies never reach this type, so `1` (internal error) is never returned.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        2
    }
}
