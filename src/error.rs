//! Error types for the stat engine.
//!
//! Every failure the engine can report is a configuration or programmer
//! error, represented by the `StatError` enum. None of them are transient,
//! so there is no retry classification.

use crate::stat_id::StatId;
use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type StatResult<T> = Result<T, StatError>;

/// Errors raised by the registry, instances and containers.
///
/// # Examples
///
/// ```rust
/// use statkit::{StatError, StatId};
///
/// let err = StatError::UnknownStat(StatId::new("armor").unwrap());
/// assert_eq!(err.to_string(), "Unknown stat: armor");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatError {
    /// A definition with this id is already registered.
    #[error("Duplicate stat definition: {0}")]
    DuplicateStat(StatId),

    /// No definition is registered for this id.
    #[error("Unknown stat: {0}")]
    UnknownStat(StatId),

    /// A definition was built with `min > max` (or a NaN bound).
    #[error("Invalid bounds for stat {id}: min {min} > max {max}")]
    InvalidBounds { id: StatId, min: f64, max: f64 },

    /// A definition was built with a NaN base value.
    #[error("Invalid base for stat {id}: {base}")]
    InvalidBase { id: StatId, base: f64 },

    /// An identifier was empty after trimming.
    ///
    /// `kind` names the identifier type (`"stat id"` or `"source id"`).
    #[error("Blank {kind}")]
    BlankId { kind: &'static str },

    /// A modifier targeting one stat was added to another stat's instance.
    #[error("Modifier for stat {actual} cannot be added to stat {expected}")]
    ModifierMismatch { expected: StatId, actual: StatId },

    /// Stat definitions could not be parsed from configuration.
    #[error("Invalid stat definitions: {0}")]
    InvalidDefinitions(String),
}

impl From<serde_json::Error> for StatError {
    fn from(err: serde_json::Error) -> Self {
        StatError::InvalidDefinitions(err.to_string())
    }
}
