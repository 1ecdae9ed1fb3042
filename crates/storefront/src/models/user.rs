//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitrina_core::{Email, UserId, Username};

/// A storefront user (domain type).
///
/// The password hash never leaves the user store; see
/// [`UserStore::get_credentials`](crate::db::UserStore::get_credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Contact address.
    pub email: Email,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
}

/// A user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// A bearer token proving an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// 40 lowercase hex characters.
    pub key: String,
    /// Owner of the token.
    pub user_id: UserId,
    /// When the token was minted.
    pub created: DateTime<Utc>,
}
