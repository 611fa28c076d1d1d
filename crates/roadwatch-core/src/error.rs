//! Common error types for roadwatch.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors shared across roadwatch crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A role tag outside the known set was encountered.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
