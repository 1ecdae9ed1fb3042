//! User store for storefront authentication.
//!
//! Products live in the catalog API; the only local data is accounts and
//! their bearer tokens.
//!
//! ## Tables
//!
//! - `users` - Accounts (username, email, argon2 password hash)
//! - `auth_tokens` - At most one live bearer token per user
//!
//! # Backends
//!
//! - [`PgUserStore`] - `PostgreSQL`, used whenever a database URL is configured
//! - [`MemoryUserStore`] - In-process maps, used without a database and in tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p vitrina-cli -- migrate
//! ```

pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use vitrina_core::{UserId, Username};

use crate::models::{AuthToken, NewUser, User};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage for accounts and bearer tokens.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Whether an account with this username exists.
    async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError>;

    /// Insert an account.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken; nothing
    /// is written in that case.
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Look up an account together with its password hash.
    async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Return the user's live token, storing `candidate` if there is none.
    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: &str,
    ) -> Result<AuthToken, RepositoryError>;

    /// Resolve a token key to its owner.
    async fn user_for_token(&self, key: &str) -> Result<Option<User>, RepositoryError>;

    /// Revoke a token. Returns whether it existed.
    async fn delete_token(&self, key: &str) -> Result<bool, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
