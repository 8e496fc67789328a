//! Catalog product records from the hosted backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pilot_wardrobe_core::ProductId;
use pilot_wardrobe_core::cart::ProductImages;

/// A product listing as stored in the backend `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discounted_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ProductImages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_official: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_deserializes_from_backend_record() {
        let record = json!({
            "id": 31,
            "title": "Captain Epaulettes (4 bar)",
            "price": 25.0,
            "discountedPrice": 19.5,
            "category": "accessories",
            "sizes": ["one-size"],
            "images": { "thumbnails": ["e1-t.jpg"], "previews": ["e1.jpg"] }
        });
        let product: Product = serde_json::from_value(record).unwrap();
        assert_eq!(product.id, ProductId::new(31));
        assert_eq!(product.discounted_price, Some("19.5".parse().unwrap()));
        assert!(product.description.is_none());
    }
}
