//! In-process user store.
//!
//! Used when no database URL is configured and by tests. Data is lost on
//! restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use vitrina_core::{UserId, Username};

use super::{RepositoryError, UserStore};
use crate::models::{AuthToken, NewUser, User};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: HashMap<UserId, (User, String)>,
    by_username: HashMap<Username, UserId>,
    tokens: HashMap<String, AuthToken>,
}

/// User store kept in memory behind a lock.
#[derive(Default)]
pub struct MemoryUserStore {
    tables: RwLock<Tables>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().by_username.contains_key(username))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write();
        if tables.by_username.contains_key(&user.username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        tables.next_id += 1;
        let created = User {
            id: UserId::new(tables.next_id),
            username: user.username.clone(),
            email: user.email.clone(),
            date_joined: Utc::now(),
        };
        tables
            .by_username
            .insert(created.username.clone(), created.id);
        tables
            .users
            .insert(created.id, (created.clone(), user.password_hash.clone()));

        Ok(created)
    }

    async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let tables = self.tables.read();
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate: &str,
    ) -> Result<AuthToken, RepositoryError> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.tokens.values().find(|t| t.user_id == user_id) {
            return Ok(existing.clone());
        }

        let token = AuthToken {
            key: candidate.to_owned(),
            user_id,
            created: Utc::now(),
        };
        tables.tokens.insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read();
        Ok(tables
            .tokens
            .get(key)
            .and_then(|token| tables.users.get(&token.user_id))
            .map(|(user, _)| user.clone()))
    }

    async fn delete_token(&self, key: &str) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().tokens.remove(key).is_some())
    }
}
