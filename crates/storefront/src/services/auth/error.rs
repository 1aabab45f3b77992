//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur while signing or verifying access tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Token is malformed, tampered with, or expired.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Configured lifetime cannot be represented as a timestamp offset.
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with this email already exists.
    #[error("user already exists")]
    DuplicateUser,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// The blocking hashing task panicked or was cancelled.
    #[error("hashing task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
