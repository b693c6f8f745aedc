//! Shared primitives for all Rust crates in Warrant.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
mod set;

use thiserror::Error;

pub use auth::Actor;
pub use set::IdentifierSet;

/// Result type used across Warrant crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty, whitespace-trimmed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Create operation collided with an existing key.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No acting identity was supplied for a mutating request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Acting identity is not an owner of the entity being mutated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Group membership lookup failed at the backend.
    #[error("group lookup failed: {0}")]
    LookupFailed(String),

    /// Stored back-references point at records that no longer exist.
    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
