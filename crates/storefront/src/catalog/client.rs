//! HTTP client for the catalog API.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use vitrina_core::ProductId;

use super::types::{Category, CategoryRef, Product};
use super::{CatalogError, FetchError, ProductChanges, ProductFields, excerpt};
use crate::config::CatalogConfig;

/// Categories for the create form, or a warning when they could not be read.
#[derive(Debug, Clone, Default)]
pub struct CategoryListing {
    pub categories: Vec<CategoryRef>,
    pub warning: Option<String>,
}

/// A product returned by a create or update call.
///
/// `body` is the catalog's response exactly as sent, including fields
/// [`Product`] does not model.
#[derive(Debug, Clone)]
pub struct SavedProduct {
    pub product: Product,
    pub body: Value,
}

/// Client for the catalog API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(concat!("vitrina/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL of the catalog API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and read the whole body.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), FetchError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Catalog API responded");
        Ok((status, body))
    }

    /// GET a resource that must answer 200 with a body of type `T`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let (status, body) = self.send(self.inner.client.get(self.url(path))).await?;

        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::MalformedBody(e.to_string()))
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on timeout, connection failure, a non-200
    /// status, or a body that is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        let products: Vec<Product> = self.get_json("/products").await.inspect_err(|e| {
            warn!(kind = e.kind(), error = %e, "Failed to list products");
        })?;
        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// List categories for the create form.
    ///
    /// Never fails: on any error the listing is empty and carries a warning.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryListing {
        match self.get_json::<Vec<Category>>("/categories").await {
            Ok(categories) => CategoryListing {
                categories: categories.into_iter().map(CategoryRef::from).collect(),
                warning: None,
            },
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Failed to load categories");
                CategoryListing {
                    categories: Vec::new(),
                    warning: Some(format!(
                        "Could not load categories from the catalog API. Please try again later. ({})",
                        e.user_message()
                    )),
                }
            }
        }
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` when the API answers 400 or 404
    /// (it answers 400 for unknown ids), otherwise `CatalogError::Fetch`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        match self.get_json(&format!("/products/{id}")).await {
            Ok(product) => Ok(product),
            Err(FetchError::UnexpectedStatus { status: 400 | 404, .. }) => {
                debug!("Product not found");
                Err(CatalogError::NotFound(id))
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Failed to fetch product");
                Err(e.into())
            }
        }
    }

    /// Create a product.
    ///
    /// Input is validated first; an invalid field sends nothing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input,
    /// `CatalogError::Upstream` when the API answers anything but 201 or an
    /// unusable body, and `CatalogError::Fetch` when it cannot be reached.
    #[instrument(skip_all, fields(title = %fields.title))]
    pub async fn create_product(
        &self,
        fields: &ProductFields,
    ) -> Result<SavedProduct, CatalogError> {
        let payload = fields.validate()?;

        let request = self.inner.client.post(self.url("/products/")).json(&payload);
        let (status, body) = self.send(request).await?;

        let saved = expect_product(status, StatusCode::CREATED, &body)?;
        info!(product_id = %saved.product.id, "Created product");
        Ok(saved)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input,
    /// `CatalogError::Upstream` when the API answers anything but 200 or an
    /// unusable body, and `CatalogError::Fetch` when it cannot be reached.
    #[instrument(skip(self, changes), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<SavedProduct, CatalogError> {
        let payload = changes.validate()?;

        let request = self
            .inner
            .client
            .put(self.url(&format!("/products/{id}")))
            .json(&payload);
        let (status, body) = self.send(request).await?;

        let saved = expect_product(status, StatusCode::OK, &body)?;
        info!("Updated product");
        Ok(saved)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Upstream` when the API answers anything but 200,
    /// or 200 with a `false` body, and `CatalogError::Fetch` when it cannot
    /// be reached.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let request = self.inner.client.delete(self.url(&format!("/products/{id}")));
        let (status, body) = self.send(request).await?;

        if status != StatusCode::OK || body.trim() == "false" {
            warn!(status = %status, body = %excerpt(&body), "Catalog API refused delete");
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                detail: excerpt(&body),
            });
        }

        info!("Deleted product");
        Ok(())
    }
}

/// Check a mutation response and parse the product it returns.
fn expect_product(
    status: StatusCode,
    expected: StatusCode,
    body: &str,
) -> Result<SavedProduct, CatalogError> {
    if status != expected {
        warn!(status = %status, body = %excerpt(body), "Catalog API rejected mutation");
        return Err(CatalogError::Upstream {
            status: status.as_u16(),
            detail: excerpt(body),
        });
    }

    let unusable = |e: serde_json::Error| {
        warn!(error = %e, "Catalog API returned an unusable product");
        CatalogError::Upstream {
            status: status.as_u16(),
            detail: format!("unexpected response body: {e}"),
        }
    };

    let body: Value = serde_json::from_str(body).map_err(unusable)?;
    let product = Product::deserialize(&body).map_err(unusable)?;
    Ok(SavedProduct { product, body })
}
