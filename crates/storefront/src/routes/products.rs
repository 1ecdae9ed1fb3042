//! Product route handlers.
//!
//! HTML pages render catalog data (or the adapter's error) together with any
//! pending flash messages. JSON endpoints answer with the
//! `{success, data | error}` envelope.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use vitrina_core::ProductId;

use crate::catalog::{CategoryRef, Images, Product, ProductChanges, ProductFields};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::flash::{push_flash, take_flashes};
use crate::models::FlashMessage;
use crate::state::AppState;

/// Where product pages send the user after an action or a failed load.
pub const PRODUCT_LIST_PATH: &str = "/products/products/";

// =============================================================================
// View Types
// =============================================================================

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: Option<String>,
    pub category_name: String,
    pub image: Option<String>,
    pub images: Vec<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            image: product.primary_image(),
            images: product.image_urls(),
            category_id: product.category_id().map(|id| id.to_string()),
            category_name: product.category_name().to_string(),
            title: product.title,
            price: product.price.to_string(),
            description: product.description,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/home.html")]
pub struct HomeTemplate {
    pub flashes: Vec<FlashMessage>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/list.html")]
pub struct ProductListTemplate {
    pub flashes: Vec<FlashMessage>,
    pub products: Vec<ProductView>,
    pub error: Option<String>,
}

/// Create-product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/create.html")]
pub struct CreateProductTemplate {
    pub flashes: Vec<FlashMessage>,
    pub categories: Vec<CategoryRef>,
}

/// Edit-product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct EditProductTemplate {
    pub flashes: Vec<FlashMessage>,
    pub product: ProductView,
}

/// Checkout screen template.
#[derive(Template, WebTemplate)]
#[template(path = "products/pay.html")]
pub struct PayTemplate {
    pub flashes: Vec<FlashMessage>,
    pub product: ProductView,
}

// =============================================================================
// Request Types
// =============================================================================

/// A scalar form value sent either as a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Number(serde_json::Number),
}

impl FormValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

fn text(value: Option<FormValue>) -> String {
    value.map(FormValue::into_text).unwrap_or_default()
}

/// JSON body for product creation.
///
/// Accepts the catalog's English keys and the create form's original keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    #[serde(alias = "nombre")]
    pub title: Option<FormValue>,
    #[serde(alias = "precio")]
    pub price: Option<FormValue>,
    #[serde(alias = "descripcion")]
    pub description: Option<FormValue>,
    #[serde(rename = "categoryId", alias = "categoriaId", alias = "category_id")]
    pub category_id: Option<FormValue>,
    #[serde(alias = "imagen", alias = "imageUrl", alias = "image_url")]
    pub image: Option<FormValue>,
}

impl From<CreateProductRequest> for ProductFields {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            title: text(req.title),
            price: text(req.price),
            description: text(req.description),
            category_id: text(req.category_id),
            image_url: text(req.image),
        }
    }
}

/// JSON body for product updates.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub title: Option<FormValue>,
    pub price: Option<FormValue>,
    pub description: Option<FormValue>,
    #[serde(rename = "categoryId", alias = "category_id")]
    pub category_id: Option<FormValue>,
    #[serde(alias = "image")]
    pub images: Option<Images>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            title: text(req.title),
            price: text(req.price),
            description: text(req.description),
            category_id: req.category_id.map(FormValue::into_text),
            images: req.images,
        }
    }
}

fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected JSON body");
        AppError::BadRequest("Invalid data format.".to_string())
    })
}

// =============================================================================
// HTML Handlers
// =============================================================================

/// Display the landing page.
pub async fn home(session: Session) -> impl IntoResponse {
    HomeTemplate {
        flashes: take_flashes(&session).await,
    }
}

/// Display the product listing, or the reason it could not be loaded.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let flashes = take_flashes(&session).await;

    let (products, error) = match state.catalog().list_products().await {
        Ok(products) => (products.into_iter().map(ProductView::from).collect(), None),
        Err(e) => (Vec::new(), Some(e.user_message())),
    };

    ProductListTemplate {
        flashes,
        products,
        error,
    }
}

/// Display the create form with the category selection.
#[instrument(skip_all)]
pub async fn create_form(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let mut flashes = take_flashes(&session).await;
    let listing = state.catalog().list_categories().await;

    if let Some(warning) = listing.warning {
        flashes.push(FlashMessage::warning(warning));
    }

    CreateProductTemplate {
        flashes,
        categories: listing.categories,
    }
}

/// Display the edit form prefilled from the catalog.
#[instrument(skip(state, session))]
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    let id = ProductId::new(id);

    match state.catalog().get_product(id).await {
        Ok(product) => EditProductTemplate {
            flashes: take_flashes(&session).await,
            product: product.into(),
        }
        .into_response(),
        Err(e) => {
            push_flash(
                &session,
                FlashMessage::error(format!(
                    "Could not load product {id} for editing: {}",
                    e.user_message()
                )),
            )
            .await;
            Redirect::to(PRODUCT_LIST_PATH).into_response()
        }
    }
}

/// Delete a product and return to the listing with the outcome.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Redirect {
    let message = match state.catalog().delete_product(ProductId::new(id)).await {
        Ok(()) => FlashMessage::success("Product deleted successfully."),
        Err(e) => FlashMessage::error(format!(
            "There was a problem deleting the product: {}",
            e.user_message()
        )),
    };

    push_flash(&session, message).await;
    Redirect::to(PRODUCT_LIST_PATH)
}

/// Display the checkout screen for one product.
#[instrument(skip(state, session))]
pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    let id = ProductId::new(id);

    match state.catalog().get_product(id).await {
        Ok(product) => PayTemplate {
            flashes: take_flashes(&session).await,
            product: product.into(),
        }
        .into_response(),
        Err(e) => {
            push_flash(
                &session,
                FlashMessage::error(format!("Could not load product {id}: {}", e.user_message())),
            )
            .await;
            Redirect::to(PRODUCT_LIST_PATH).into_response()
        }
    }
}

// =============================================================================
// JSON Handlers
// =============================================================================

/// List products as JSON.
pub async fn api_list(State(state): State<AppState>) -> Result<Json<Value>> {
    let products = state
        .catalog()
        .list_products()
        .await
        .map_err(|e| AppError::Catalog(e.into()))?;

    Ok(Json(json!({ "success": true, "data": products })))
}

/// Create a product from a JSON body.
pub async fn api_create(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let fields = ProductFields::from(json_body(body)?);
    let saved = state.catalog().create_product(&fields).await?;

    Ok(Json(json!({ "success": true, "data": saved.body })))
}

/// Update a product from a JSON body.
pub async fn api_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: std::result::Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let changes = ProductChanges::from(json_body(body)?);
    let saved = state
        .catalog()
        .update_product(ProductId::new(id), &changes)
        .await?;

    Ok(Json(json!({ "success": true, "data": saved.body })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_original_keys_and_numbers() {
        let req: CreateProductRequest = serde_json::from_value(json!({
            "nombre": "Chair",
            "precio": 19.99,
            "descripcion": "Wood",
            "categoriaId": 1,
            "imagen": "http://img/x.png"
        }))
        .unwrap();

        let fields = ProductFields::from(req);
        assert_eq!(fields.title, "Chair");
        assert_eq!(fields.price, "19.99");
        assert_eq!(fields.category_id, "1");
        assert_eq!(fields.image_url, "http://img/x.png");
    }

    #[test]
    fn test_create_request_accepts_english_keys() {
        let req: CreateProductRequest = serde_json::from_value(json!({
            "title": "Chair",
            "price": "19.99",
            "description": "Wood",
            "categoryId": "1",
            "image": "http://img/x.png"
        }))
        .unwrap();

        assert!(ProductFields::from(req).validate().is_ok());
    }

    #[test]
    fn test_missing_keys_become_empty_fields() {
        let req: CreateProductRequest = serde_json::from_value(json!({"title": "Chair"})).unwrap();
        let fields = ProductFields::from(req);
        assert!(fields.price.is_empty());
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_update_request_optional_fields() {
        let req: UpdateProductRequest = serde_json::from_value(json!({
            "title": "Chair",
            "price": 25,
            "description": "Oak",
            "images": "http://img/y.png"
        }))
        .unwrap();

        let changes = ProductChanges::from(req);
        assert_eq!(changes.price, "25");
        assert!(changes.category_id.is_none());
        assert_eq!(
            changes.images,
            Some(Images::One("http://img/y.png".to_string()))
        );
    }

    #[test]
    fn test_product_view_images_are_plain_urls() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "title": "Lamp",
            "price": 40,
            "images": ["[\"https://i.imgur.com/a.jpeg\"]"]
        }))
        .unwrap();

        let view = ProductView::from(product);
        assert_eq!(view.images, vec!["https://i.imgur.com/a.jpeg".to_string()]);
        assert_eq!(view.image.as_deref(), Some("https://i.imgur.com/a.jpeg"));
    }
}
