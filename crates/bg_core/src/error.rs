//! Error types for the battle simulation core.

use thiserror::Error;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for all battle-core errors.
///
/// Configuration errors (invalid construction arguments) are the only variants
/// expected to reach a caller; engine-internal anomalies are logged and absorbed
/// by the tick loop rather than surfaced here.
#[derive(Debug, Error)]
pub enum BattleError {
    /// A `TroopStrategy` or `Simple` strategy was constructed with `favorite == hated`.
    #[error("strategy favorite and hated type must differ, got {0:?} for both")]
    FavoriteEqualsHated(crate::unit::UnitType),

    /// Referenced a named strategy the registry doesn't know about.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Referenced a named scenario/formation the catalog doesn't know about.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A scenario or sweep parameter was out of its valid domain.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: String,
        /// Human-readable explanation.
        message: String,
    },

    /// Scenario/strategy RON file failed to parse.
    #[error("failed to parse '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// A referenced unit identifier does not resolve (dead or never existed).
    #[error("invalid unit id: {0:?}")]
    InvalidUnitId(crate::unit::UnitId),

    /// Invalid battlefield dimensions (size-x or size-y below the enforced minimum).
    #[error("invalid battlefield size {size_x}x{size_y}: minimum is {min}")]
    InvalidBattlefieldSize {
        /// Requested width.
        size_x: f64,
        /// Requested height.
        size_y: f64,
        /// Enforced minimum for either dimension.
        min: f64,
    },
}
