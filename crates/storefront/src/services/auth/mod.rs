//! Authentication service.
//!
//! Password accounts with a single bearer token per user. The token is
//! minted on registration or on the first login after a logout, reused by
//! every later login, and deleted on logout.

mod error;

pub use error::{AuthError, FieldErrors};

use std::fmt::Write as _;
use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

use vitrina_core::{Email, Username};

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Random bytes in a token key (hex-encoded to 40 characters).
const TOKEN_BYTES: usize = 20;

/// Hash checked when no account matches a login's username.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("vitrina-no-such-account").ok());

const REQUIRED: &str = "This field is required.";

/// Registration input as submitted. Absent fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "password_confirm", alias = "confirm")]
    pub password2: String,
}

/// A user together with their live token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub token: String,
}

/// Authentication service.
///
/// Handles registration, login, logout and token lookups.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new account and issue its token.
    ///
    /// Every field is checked before anything is written; a rejected
    /// registration leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with per-field messages if any field is
    /// empty or malformed, the passwords differ, or the username is taken.
    pub async fn register(&self, input: &RegistrationInput) -> Result<Authenticated, AuthError> {
        let mut errors = FieldErrors::new();

        let username = match input.username.trim() {
            "" => {
                errors.entry("username").or_default().push(REQUIRED.to_owned());
                None
            }
            raw => match Username::parse(raw) {
                Ok(username) => Some(username),
                Err(e) => {
                    errors.entry("username").or_default().push(capitalize(&e.to_string()));
                    None
                }
            },
        };

        if let Some(username) = &username
            && self.users.username_exists(username).await?
        {
            errors
                .entry("username")
                .or_default()
                .push("A user with that username already exists.".to_owned());
        }

        let email = match input.email.trim() {
            "" => {
                errors.entry("email").or_default().push(REQUIRED.to_owned());
                None
            }
            raw => match Email::parse(raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors
                        .entry("email")
                        .or_default()
                        .push("Enter a valid email address.".to_owned());
                    None
                }
            },
        };

        if input.password.is_empty() {
            errors.entry("password").or_default().push(REQUIRED.to_owned());
        } else if let Err(msg) = validate_password(&input.password) {
            errors.entry("password").or_default().push(msg);
        }

        if input.password2.is_empty() {
            errors.entry("password2").or_default().push(REQUIRED.to_owned());
        } else if input.password != input.password2 {
            errors
                .entry("password2")
                .or_default()
                .push("Passwords do not match.".to_owned());
        }

        let (Some(username), Some(email), true) = (username, email, errors.is_empty()) else {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Registration rejected");
            return Err(AuthError::Rejected(errors));
        };

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .create_user(&NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                RepositoryError::Conflict(_) => AuthError::Rejected(FieldErrors::from([(
                    "username",
                    vec!["A user with that username already exists.".to_owned()],
                )])),
                other => AuthError::Repository(other),
            })?;

        let token = self.issue_token(&user).await?;
        info!(user_id = %user.id, "Registered user");

        Ok(Authenticated { user, token })
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is empty.
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<Authenticated, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, password_hash)) = self.users.get_credentials(&username).await? else {
            // Unknown usernames still pay for one argon2 verification
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, hash);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        let token = self.issue_token(&user).await?;
        info!(user_id = %user.id, "User logged in");

        Ok(Authenticated { user, token })
    }

    /// Revoke a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token was not live.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.users.delete_token(token).await? {
            info!("User logged out");
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }

    /// Resolve a token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or revoked.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        self.users
            .user_for_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Whether a username can still be registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingUsername` for an empty username and
    /// `AuthError::Rejected` for a malformed one.
    pub async fn check_username_available(&self, username: &str) -> Result<bool, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::MissingUsername);
        }

        let username = Username::parse(username).map_err(|e| {
            AuthError::Rejected(FieldErrors::from([(
                "username",
                vec![capitalize(&e.to_string())],
            )]))
        })?;

        Ok(!self.users.username_exists(&username).await?)
    }

    async fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let token = self
            .users
            .get_or_create_token(user.id, &generate_token())
            .await?;
        Ok(token.key)
    }
}

/// Generate a 40-character lowercase hex token key.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);

    let mut key = String::with_capacity(TOKEN_BYTES * 2);
    for byte in bytes {
        let _ = write!(key, "{byte:02x}");
    }
    key
}

fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    Ok(())
}

/// Hash a password with argon2 and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = first.to_uppercase().collect::<String>();
        out.push_str(chars.as_str());
        out.push('.');
        out
    })
}
