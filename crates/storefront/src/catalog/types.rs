//! Catalog API response types.
//!
//! Field names follow the catalog API's camelCase schema. Only `id`, `title`
//! and `price` are required on a product; everything else tolerates absence
//! because the API omits fields on some responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrina_core::{CategoryId, ProductId};

/// A product as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// First usable image URL.
    ///
    /// The catalog API sometimes stores an image list as a JSON-encoded
    /// string (`["[\"https://...\"]"]`); the quoting is stripped here.
    #[must_use]
    pub fn primary_image(&self) -> Option<String> {
        self.image_urls()
            .into_iter()
            .find(|url| url.starts_with("http://") || url.starts_with("https://"))
    }

    /// Image URLs with any JSON list quoting stripped, blanks dropped.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|raw| raw.trim_matches(|c| matches!(c, '[' | ']' | '"' | ' ')))
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Category id, if the product carries one.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().map(|c| c.id)
    }

    /// Category name, or an empty string.
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("", |c| c.name.as_str())
    }
}

/// A category as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A category reduced to what the create form needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_product() {
        let product: Product = serde_json::from_value(json!({
            "id": 4,
            "title": "Handmade Fresh Table",
            "slug": "handmade-fresh-table",
            "price": 687,
            "description": "Andy shoes are designed to keeping in...",
            "category": {
                "id": 5,
                "name": "Others",
                "slug": "others",
                "image": "https://placehold.co/600x400",
                "creationAt": "2023-01-03T15:58:58.000Z"
            },
            "images": ["https://placehold.co/600x400"],
            "creationAt": "2023-01-03T15:58:58.000Z",
            "updatedAt": "2023-01-03T15:58:58.000Z"
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.price, Decimal::from(687));
        assert_eq!(product.category_name(), "Others");
        assert_eq!(product.category_id(), Some(CategoryId::new(5)));
    }

    #[test]
    fn test_deserialize_minimal_product() {
        let product: Product =
            serde_json::from_value(json!({"id": 42, "title": "Chair", "price": 19.99})).unwrap();
        assert!(product.images.is_empty());
        assert!(product.category.is_none());
        assert_eq!(product.price.to_string(), "19.99");
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let result = serde_json::from_value::<Product>(json!({"id": 1, "title": "Chair"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_primary_image_strips_encoded_list() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Chair",
            "price": 1,
            "images": ["[\"https://i.imgur.com/QkIa5tT.jpeg\"", "\"https://i.imgur.com/x.jpeg\"]"]
        }))
        .unwrap();
        assert_eq!(
            product.primary_image().as_deref(),
            Some("https://i.imgur.com/QkIa5tT.jpeg")
        );
    }

    #[test]
    fn test_image_urls_unquotes_every_entry() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Chair",
            "price": 1,
            "images": ["[\"https://i.imgur.com/a.jpeg\"", "\"https://i.imgur.com/b.jpeg\"]", "[]"]
        }))
        .unwrap();
        assert_eq!(
            product.image_urls(),
            vec![
                "https://i.imgur.com/a.jpeg".to_string(),
                "https://i.imgur.com/b.jpeg".to_string()
            ]
        );
    }

    #[test]
    fn test_category_ref_drops_extras() {
        let category: Category = serde_json::from_value(json!({
            "id": 1, "name": "Clothes", "slug": "clothes", "image": "https://x/y.png"
        }))
        .unwrap();
        let reduced = CategoryRef::from(category);
        assert_eq!(
            serde_json::to_value(reduced).unwrap(),
            json!({"id": 1, "name": "Clothes"})
        );
    }
}
