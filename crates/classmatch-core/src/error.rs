//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced entity does not exist. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A validation error in domain logic or request payload.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (duplicate email,
    /// duplicate enrollment, duplicate membership).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
