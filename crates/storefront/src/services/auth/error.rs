//! Authentication error types.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::db::RepositoryError;

/// Per-field validation messages, keyed by input field name.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration input failed validation. Nothing was stored.
    #[error("registration rejected")]
    Rejected(FieldErrors),

    /// Username or password missing from a login.
    #[error("username and password are required")]
    MissingCredentials,

    /// Username missing from an availability check.
    #[error("a username is required")]
    MissingUsername,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token missing, unknown, or revoked.
    #[error("invalid or revoked token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
