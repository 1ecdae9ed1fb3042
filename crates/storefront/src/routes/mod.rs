//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                    - Redirect to /products/
//!
//! # Accounts (JSON unless noted)
//! POST /accounts/register/                  - Register, returns user + token (rate limited)
//! POST /accounts/login/                     - Login, returns user + token (rate limited)
//! POST /accounts/logout/                    - Revoke token (requires token)
//! GET  /accounts/profile/                   - Current user (requires token)
//! GET  /accounts/check-username/?username=  - Username availability
//! GET  /accounts/login-form/                - Login page (HTML)
//! GET  /accounts/register-form/             - Registration page (HTML)
//!
//! # Products (HTML unless noted)
//! GET  /products/                           - Home page
//! GET  /products/products/                  - Product listing
//! GET  /products/api/products/              - Product listing (JSON)
//! GET  /products/crear/                     - Create form
//! POST /products/crear/                     - Create product (JSON)
//! POST /products/api/crear/                 - Create product (JSON)
//! GET  /products/products/{id}/editar/      - Edit form
//! PUT  /products/api/products/{id}/editar/  - Update product (JSON)
//! POST /products/products/{id}/eliminar/    - Delete, then redirect with flash
//! GET  /products/pagar/{id}/                - Checkout screen
//! ```

pub mod accounts;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    let credentials = Router::new()
        .route("/register/", post(accounts::register))
        .route("/login/", post(accounts::login))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/logout/", post(accounts::logout))
        .route("/profile/", get(accounts::profile))
        .route("/check-username/", get(accounts::check_username))
        .route("/login-form/", get(accounts::login_page))
        .route("/register-form/", get(accounts::register_page))
        .merge(credentials)
}

/// Create the product routes router.
///
/// Paths are absolute because the home page sits at `/products/` itself.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(products::home))
        .route("/products/products/", get(products::list))
        .route("/products/api/products/", get(products::api_list))
        .route(
            "/products/crear/",
            get(products::create_form).post(products::api_create),
        )
        .route("/products/api/crear/", post(products::api_create))
        .route("/products/products/{id}/editar/", get(products::edit_form))
        .route(
            "/products/api/products/{id}/editar/",
            put(products::api_update),
        )
        .route("/products/products/{id}/eliminar/", post(products::delete))
        .route("/products/pagar/{id}/", get(products::pay))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products/") }))
        .nest("/accounts", account_routes())
        .merge(product_routes())
}
