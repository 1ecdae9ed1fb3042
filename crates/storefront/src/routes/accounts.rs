//! Account route handlers.
//!
//! The JSON endpoints back the login and registration pages; the pages
//! themselves only render the forms and leave submission to
//! `static/js/accounts.js`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::RequireToken;
use crate::models::FlashMessage;
use crate::models::flash::take_flashes;
use crate::services::auth::{Authenticated, RegistrationInput};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<FlashMessage>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/register.html")]
pub struct RegisterTemplate {
    pub flashes: Vec<FlashMessage>,
}

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Query string for the username availability check.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckUsernameQuery {
    pub username: String,
}

fn authenticated_body(message: &str, auth: &Authenticated) -> Value {
    json!({
        "success": true,
        "message": message,
        "user": auth.user,
        "token": auth.token,
    })
}

// =============================================================================
// Page Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        flashes: take_flashes(&session).await,
    }
}

/// Display the registration page.
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        flashes: take_flashes(&session).await,
    }
}

// =============================================================================
// JSON Handlers
// =============================================================================

/// Register a new account.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegistrationInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) =
        body.map_err(|_| AppError::BadRequest("Invalid data format.".to_string()))?;

    let auth = state.auth().register(&input).await?;
    set_sentry_user(&auth.user.id, Some(auth.user.username.as_str()));

    Ok((
        StatusCode::CREATED,
        Json(authenticated_body("User registered successfully", &auth)),
    ))
}

/// Exchange a username and password for the account's token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    // An unreadable body is treated as one without credentials
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let auth = state.auth().login(&req.username, &req.password).await?;
    set_sentry_user(&auth.user.id, Some(auth.user.username.as_str()));

    Ok(Json(authenticated_body("Login successful", &auth)))
}

/// Revoke the presented token.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    RequireToken { token, .. }: RequireToken,
) -> Result<Json<Value>> {
    state.auth().logout(&token).await?;
    clear_sentry_user();

    Ok(Json(json!({
        "success": true,
        "message": "Logged out successfully",
    })))
}

/// Return the authenticated user's profile.
pub async fn profile(RequireToken { user, .. }: RequireToken) -> Json<Value> {
    Json(json!({ "success": true, "user": user }))
}

/// Report whether a username is still free.
#[instrument(skip(state))]
pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<CheckUsernameQuery>,
) -> Result<Json<Value>> {
    let available = state
        .auth()
        .check_username_available(&query.username)
        .await?;

    Ok(Json(json!({ "success": true, "available": available })))
}
