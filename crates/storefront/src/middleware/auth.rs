//! Bearer token extractor.
//!
//! Authenticated JSON endpoints take [`RequireToken`] as an argument. The
//! token is read from the `Authorization` header in either the
//! `Token <key>` or `Bearer <key>` form and resolved against the user store.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// An authenticated request: the user and the token they presented.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireToken { user, .. }: RequireToken) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireToken {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for RequireToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_authorization)
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided".to_string())
            })?;

        let user = state.auth().authenticate(token).await.map_err(|e| match e {
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".to_string()),
            other => AppError::Auth(other),
        })?;

        set_sentry_user(&user.id, Some(user.username.as_str()));

        Ok(Self {
            user,
            token: token.to_owned(),
        })
    }
}

/// Extract the key from `Token <key>` or `Bearer <key>`.
fn parse_authorization(header: &str) -> Option<&str> {
    let (scheme, key) = header.trim().split_once(' ')?;
    let key = key.trim();
    let known = scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
    (known && !key.is_empty() && !key.contains(' ')).then_some(key)
}
