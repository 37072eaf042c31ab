//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors raised while setting up or running a colony.
///
/// `Validation` is returned before any iteration executes; `Algorithm`
/// signals a broken internal invariant and aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Malformed distance matrix or out-of-range configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal invariant violation (malformed route, index overflow).
    #[error("algorithm error: {0}")]
    Algorithm(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AcoError>;

impl AcoError {
    /// Builds a [`AcoError::Validation`] from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Builds a [`AcoError::Algorithm`] from a message.
    pub fn algorithm(message: impl Into<String>) -> Self {
        Self::Algorithm(message.into())
    }

    /// Returns `true` for configuration and input errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
