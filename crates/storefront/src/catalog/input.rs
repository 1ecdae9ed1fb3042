//! Validation of product input before it is sent to the catalog API.
//!
//! Handlers collect raw text fields; nothing reaches the network until it has
//! been turned into a [`NewProduct`] or [`ProductUpdate`], whose serialized
//! form is exactly the catalog API's schema.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vitrina_core::{CategoryId, Price, PriceError};

/// Input rejected before any outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("all fields are required (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("category id must be a positive integer (got '{0}')")]
    InvalidCategory(String),
}

/// Raw create-form fields, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: String,
    pub image_url: String,
}

/// Raw update fields. Category and images are forwarded only when present.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: Option<String>,
    pub images: Option<Images>,
}

/// One image URL or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Images {
    One(String),
    Many(Vec<String>),
}

impl Images {
    /// Normalize to a list of trimmed, non-empty URLs.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        let urls = match self {
            Self::One(url) => vec![url],
            Self::Many(urls) => urls,
        };
        urls.into_iter()
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .collect()
    }
}

/// Create payload in the catalog API's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub price: Price,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: CategoryId,
    pub images: Vec<String>,
}

/// Update payload in the catalog API's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductUpdate {
    pub title: String,
    pub price: Price,
    pub description: String,
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ProductFields {
    /// Check every field and build the outbound payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a field is blank, the price is not a
    /// positive decimal, or the category id is not a positive integer.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        require(&[
            ("title", &self.title),
            ("price", &self.price),
            ("description", &self.description),
            ("categoryId", &self.category_id),
            ("image", &self.image_url),
        ])?;

        Ok(NewProduct {
            title: self.title.trim().to_owned(),
            price: Price::parse(&self.price)?,
            description: self.description.trim().to_owned(),
            category_id: parse_category_id(&self.category_id)?,
            images: vec![self.image_url.trim().to_owned()],
        })
    }
}

impl ProductChanges {
    /// Check the required fields and build the outbound payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if title, price or description is blank,
    /// the price is invalid, or a given category id is invalid.
    pub fn validate(&self) -> Result<ProductUpdate, ValidationError> {
        require(&[
            ("title", &self.title),
            ("price", &self.price),
            ("description", &self.description),
        ])?;

        let category_id = self
            .category_id
            .as_deref()
            .map(parse_category_id)
            .transpose()?;

        // Blank image inputs leave the product's images untouched
        let images = self
            .images
            .clone()
            .map(Images::into_vec)
            .filter(|urls| !urls.is_empty());

        Ok(ProductUpdate {
            title: self.title.trim().to_owned(),
            price: Price::parse(&self.price)?,
            description: self.description.trim().to_owned(),
            category_id,
            images,
        })
    }
}

fn require(fields: &[(&'static str, &String)]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

fn parse_category_id(raw: &str) -> Result<CategoryId, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Ok(CategoryId::new(id)),
        _ => Err(ValidationError::InvalidCategory(trimmed.to_owned())),
    }
}
