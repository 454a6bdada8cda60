//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// conflicts, authorization). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation (e.g. a title that normalizes to nothing).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A conflict occurred (duplicate slug, or an exhausted optimistic-write
    /// retry budget).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Mutation attempted by someone other than the owner.
    #[error("forbidden")]
    Forbidden,

    /// A requested resource was not found.
    #[error("not found")]
    NotFound,

    /// Infrastructure failure surfaced through the domain boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
