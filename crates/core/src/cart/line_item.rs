//! Cart line items and the runtime shape check for persisted records.
//!
//! The serialized cart is client-controlled data: it round-trips through the
//! customer's session and may come back truncated, hand-edited, or written
//! by an older release. Records are therefore checked against
//! [`CartLineItem::matches_shape`] before they are trusted - never blindly
//! deserialized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ProductId;

/// Ordered image references for a product.
///
/// Both sequences must be present when `images` is present at all; either
/// may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    pub thumbnails: Vec<String>,
    pub previews: Vec<String>,
}

/// One entry in the cart: a product (and optional size) with a quantity.
///
/// Field names serialize in camelCase, matching the format the web frontend
/// reads back out of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Stable product identifier. Not unique per line: the same product can
    /// appear once per size.
    pub id: ProductId,
    pub title: String,
    /// Original unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Effective unit price; equals `price` when there is no discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub discounted_price: Decimal,
    /// Always >= 1; a line that would reach 0 is removed instead.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ProductImages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_official: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Size labels the seller offers for this product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

/// Product data as submitted by an add-to-cart action.
///
/// Same shape as [`CartLineItem`] minus the quantity, with the discount
/// optional: a missing `discountedPrice` means "no discount", never an
/// error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discounted_price: Option<Decimal>,
    #[serde(default)]
    pub images: Option<ProductImages>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub is_official: Option<bool>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub reviews: Option<u32>,
}

impl CartLineItem {
    /// Create a line item from an add-to-cart submission.
    #[must_use]
    pub fn from_product(product: CartProduct, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            discounted_price: product.discounted_price.unwrap_or(product.price),
            quantity,
            images: product.images,
            size: product.size,
            is_official: product.is_official,
            seller: product.seller,
            store: product.store,
            category: product.category,
            sizes: product.sizes,
            reviews: product.reviews,
        }
    }

    /// Runtime type guard for a persisted cart record.
    ///
    /// Required fields must be present with the correct primitive type;
    /// optional fields may be absent (or null) but are rejected when present
    /// with the wrong type, so that a record passing the guard always
    /// deserializes cleanly.
    #[must_use]
    pub fn matches_shape(value: &Value) -> bool {
        let Some(obj) = value.as_object() else {
            return false;
        };

        let id_ok = obj.get("id").is_some_and(|v| v.as_i64().is_some());
        let title_ok = obj
            .get("title")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty());
        let price_ok = obj
            .get("price")
            .and_then(Value::as_f64)
            .is_some_and(|p| p >= 0.0);
        let discounted_ok = obj
            .get("discountedPrice")
            .and_then(Value::as_f64)
            .is_some_and(|p| p >= 0.0);
        let quantity_ok = obj
            .get("quantity")
            .and_then(Value::as_u64)
            .is_some_and(|q| q >= 1);

        if !(id_ok && title_ok && price_ok && discounted_ok && quantity_ok) {
            return false;
        }

        images_shape_ok(obj.get("images"))
            && optional_string_ok(obj.get("size"))
            && optional_bool_ok(obj.get("isOfficial"))
            && optional_string_ok(obj.get("seller"))
            && optional_string_ok(obj.get("store"))
            && optional_string_ok(obj.get("category"))
            && optional_string_list_ok(obj.get("sizes"))
            && optional_count_ok(obj.get("reviews"))
    }

    /// Validate and convert a persisted record, or `None` when it fails the
    /// shape check.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !Self::matches_shape(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// `images`, when present, must carry both ordered sequences.
fn images_shape_ok(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Object(images)) => {
            string_list_ok(images.get("thumbnails")) && string_list_ok(images.get("previews"))
        }
        Some(_) => false,
    }
}

fn string_list_ok(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn optional_string_ok(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::String(_)))
}

fn optional_bool_ok(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::Bool(_)))
}

fn optional_string_list_ok(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        other => string_list_ok(other),
    }
}

fn optional_count_ok(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(v) => v.as_u64().is_some(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "id": 101,
            "title": "Flight Jacket",
            "price": 120.0,
            "discountedPrice": 99.5,
            "quantity": 2,
            "images": { "thumbnails": ["t1.jpg"], "previews": [] },
            "size": "M",
            "isOfficial": true,
            "seller": "SkyTrader",
            "category": "jackets",
            "sizes": ["S", "M", "L"],
            "reviews": 12
        })
    }

    #[test]
    fn guard_accepts_valid_record() {
        assert!(CartLineItem::matches_shape(&valid_record()));
        let item = CartLineItem::from_value(&valid_record()).unwrap();
        assert_eq!(item.id, ProductId::new(101));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.size.as_deref(), Some("M"));
    }

    #[test]
    fn guard_accepts_minimal_record() {
        let record = json!({
            "id": 1,
            "title": "Epaulettes",
            "price": 15,
            "discountedPrice": 15,
            "quantity": 1
        });
        assert!(CartLineItem::from_value(&record).is_some());
    }

    #[test]
    fn guard_rejects_missing_required_field() {
        let mut record = valid_record();
        record.as_object_mut().unwrap().remove("title");
        assert!(!CartLineItem::matches_shape(&record));
    }

    #[test]
    fn guard_rejects_empty_title() {
        let mut record = valid_record();
        record["title"] = json!("");
        assert!(!CartLineItem::matches_shape(&record));
    }

    #[test]
    fn guard_rejects_wrong_primitive_types() {
        let mut record = valid_record();
        record["price"] = json!("120.0");
        assert!(!CartLineItem::matches_shape(&record));

        let mut record = valid_record();
        record["quantity"] = json!(1.5);
        assert!(!CartLineItem::matches_shape(&record));

        let mut record = valid_record();
        record["isOfficial"] = json!("yes");
        assert!(!CartLineItem::matches_shape(&record));
    }

    #[test]
    fn guard_rejects_negative_price_and_zero_quantity() {
        let mut record = valid_record();
        record["discountedPrice"] = json!(-1.0);
        assert!(!CartLineItem::matches_shape(&record));

        let mut record = valid_record();
        record["quantity"] = json!(0);
        assert!(!CartLineItem::matches_shape(&record));
    }

    #[test]
    fn guard_rejects_images_missing_previews() {
        let mut record = valid_record();
        record["images"] = json!({ "thumbnails": [] });
        assert!(!CartLineItem::matches_shape(&record));
    }

    #[test]
    fn guard_rejects_non_object() {
        assert!(!CartLineItem::matches_shape(&json!("cart")));
        assert!(!CartLineItem::matches_shape(&json!(42)));
        assert!(!CartLineItem::matches_shape(&json!([])));
    }

    #[test]
    fn from_product_defaults_discounted_price() {
        let product: CartProduct = serde_json::from_value(json!({
            "id": 7,
            "title": "Headset Bag",
            "price": 45.0
        }))
        .unwrap();
        let item = CartLineItem::from_product(product, 1);
        assert_eq!(item.discounted_price, item.price);
    }

    #[test]
    fn line_item_round_trips_through_json() {
        let item = CartLineItem::from_value(&valid_record()).unwrap();
        let raw = serde_json::to_string(&item).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert!(CartLineItem::matches_shape(&parsed));
        assert_eq!(CartLineItem::from_value(&parsed).unwrap(), item);
    }
}
