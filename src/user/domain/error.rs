//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The badge label is empty after trimming.
    #[error("badge label must not be empty")]
    EmptyBadge,

    /// The email address is empty or lacks an `@` separator.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}
