//! Catalog API adapter.
//!
//! # Architecture
//!
//! - The external catalog API is the only source of truth for products and
//!   categories. NO local copy, NO cache: every page re-fetches.
//! - Every call is a single attempt bounded by the configured timeout.
//! - Every failure is converted into a [`CatalogError`] at this boundary, so
//!   route handlers only ever see typed outcomes.
//!
//! # Endpoints
//!
//! ```text
//! GET    /products        - list products
//! GET    /products/{id}   - get one product
//! POST   /products/       - create (success is 201)
//! PUT    /products/{id}   - update (success is 200)
//! DELETE /products/{id}   - delete (success is 200)
//! GET    /categories      - list categories for the create form
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_storefront::catalog::{CatalogClient, ProductFields};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let product = client
//!     .create_product(&ProductFields {
//!         title: "Chair".into(),
//!         price: "19.99".into(),
//!         description: "Wood".into(),
//!         category_id: "1".into(),
//!         image_url: "http://img/x.png".into(),
//!     })
//!     .await?;
//! ```

mod client;
mod input;
pub mod types;

pub use client::{CatalogClient, CategoryListing, SavedProduct};
pub use input::{Images, NewProduct, ProductChanges, ProductFields, ProductUpdate, ValidationError};
pub use types::{Category, CategoryRef, Product};

use thiserror::Error;
use vitrina_core::ProductId;

/// Maximum number of upstream body characters kept in errors and logs.
pub(crate) const BODY_EXCERPT_LEN: usize = 500;

/// A read from the catalog API that did not produce usable data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The call exceeded the configured timeout.
    #[error("timed out waiting for the catalog API")]
    Timeout,

    /// The catalog API could not be reached (refused, DNS, TLS, reset).
    #[error("could not connect to the catalog API: {0}")]
    Connection(String),

    /// The catalog API answered with a status other than the expected one.
    #[error("catalog API returned status {status}")]
    UnexpectedStatus { status: u16, body: String },

    /// The catalog API answered with a body that does not match its schema.
    #[error("catalog API returned a malformed body: {0}")]
    MalformedBody(String),
}

impl FetchError {
    /// Stable machine-readable name of the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection(_) => "connection",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::MalformedBody(_) => "malformed_body",
        }
    }

    /// Message safe to show to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout => "The catalog service took too long to respond. Please try again.".to_string(),
            Self::Connection(_) => {
                "Could not reach the catalog service. Check your connection and try again.".to_string()
            }
            Self::UnexpectedStatus { status, .. } => format!("Catalog service error: {status}"),
            Self::MalformedBody(_) => "The catalog service sent an unexpected response.".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedBody(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

/// Errors returned by the catalog adapter.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input was missing or malformed; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A mutation was rejected by the catalog API, or it answered a
    /// success status with an unusable body.
    #[error("catalog API error: {status} - {detail}")]
    Upstream { status: u16, detail: String },

    /// The requested product does not exist upstream.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The catalog API could not be read.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CatalogError {
    /// Message safe to show to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Keep at most [`BODY_EXCERPT_LEN`] characters of an upstream body.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}
