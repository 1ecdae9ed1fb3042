//! Account management commands.
//!
//! Accounts go through the same registration rules as the storefront's
//! `/accounts/register/` endpoint.

use vitrina_storefront::db::{self, PgUserStore};
use vitrina_storefront::services::auth::{AuthError, AuthService, RegistrationInput};

use super::{CommandError, database_url};

async fn store() -> Result<PgUserStore, CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    Ok(PgUserStore::new(db::create_pool(&database_url).await?))
}

/// Create an account and print its token.
pub async fn create(username: &str, email: &str, password: &str) -> Result<(), CommandError> {
    let users = store().await?;
    let auth = AuthService::new(&users);

    let input = RegistrationInput {
        username: username.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        password2: password.to_owned(),
    };

    let created = match auth.register(&input).await {
        Ok(created) => created,
        Err(AuthError::Rejected(errors)) => {
            for (field, messages) in &errors {
                for message in messages {
                    tracing::error!("{field}: {message}");
                }
            }
            return Err(AuthError::Rejected(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}",
        created.user.id,
        created.user.username
    );
    tracing::info!("  Token: {}", created.token);

    Ok(())
}

/// Report whether a username can still be registered.
pub async fn check(username: &str) -> Result<(), CommandError> {
    let users = store().await?;

    if AuthService::new(&users)
        .check_username_available(username)
        .await?
    {
        tracing::info!("Username '{username}' is available");
    } else {
        tracing::info!("Username '{username}' is taken");
    }

    Ok(())
}
