//! Tween error types
//!
//! Nothing on the per-frame path returns these. They back the optional
//! validation layer (`Tween::try_new`, `Easing::from_str`).

use thiserror::Error;

/// Errors raised while validating tween input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// Easing name does not match any known curve
    #[error("Unknown easing curve: {0}")]
    UnknownEasing(String),

    /// Origin and target do not animate the same properties
    #[error("Origin and target keys differ (missing from origin: {missing:?}, missing from target: {extra:?})")]
    MismatchedKeys {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// A start or end value is NaN or infinite
    #[error("Property {key} is not a finite number")]
    NonFiniteValue { key: String },
}

/// Result type for tween validation
pub type Result<T> = std::result::Result<T, TweenError>;
