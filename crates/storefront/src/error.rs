//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. JSON route handlers return `Result<T, AppError>`;
//! the error renders as the `{success: false, error}` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(err) => match err {
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CatalogError::Upstream { status, .. } => StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
            },
            Self::Auth(err) => match err {
                AuthError::Rejected(_) | AuthError::MissingCredentials | AuthError::MissingUsername => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            // Don't expose internal error details to clients
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Catalog(err) => err.user_message(),
            Self::Auth(err) => match err {
                AuthError::Rejected(_) => "Registration failed".to_string(),
                AuthError::MissingCredentials => "Username and password are required".to_string(),
                AuthError::MissingUsername => "A username is required".to_string(),
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::InvalidToken => "Invalid or expired token".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Authentication error".to_string()
                }
            },
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }

    const fn is_server_side(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Catalog(CatalogError::Fetch(_) | CatalogError::Upstream { .. })
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_side() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let message = self.public_message();

        let body = match &self {
            Self::Auth(AuthError::Rejected(errors)) => json!({
                "success": false,
                "message": message,
                "errors": errors,
            }),
            Self::Auth(_) | Self::Unauthorized(_) => json!({
                "success": false,
                "error": message,
                "message": message,
            }),
            _ => json!({
                "success": false,
                "error": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use vitrina_core::ProductId;

    use super::*;
    use crate::catalog::{FetchError, ValidationError};
    use crate::services::auth::FieldErrors;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_catalog_status_codes() {
        let status = |err: CatalogError| AppError::Catalog(err).status();

        assert_eq!(
            status(ValidationError::MissingFields(vec!["title"]).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(CatalogError::NotFound(ProductId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(FetchError::Timeout.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(CatalogError::Upstream {
                status: 422,
                detail: String::new()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        // A success status with an unusable body is a gateway failure
        assert_eq!(
            status(CatalogError::Upstream {
                status: 200,
                detail: String::new()
            }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(
            AppError::Auth(AuthError::MissingCredentials).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let (status, body) = body_json(AppError::Catalog(CatalogError::Upstream {
            status: 400,
            detail: "bad price".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "catalog API error: 400 - bad price");
    }

    #[tokio::test]
    async fn test_registration_envelope_carries_field_errors() {
        let errors = FieldErrors::from([("username", vec!["Taken.".to_string()])]);
        let (status, body) = body_json(AppError::Auth(AuthError::Rejected(errors))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["username"][0], "Taken.");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (_, body) = body_json(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
