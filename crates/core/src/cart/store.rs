//! The cart store: single source of truth for the active session's cart.
//!
//! Every mutation re-serializes the full collection to the storage backend
//! (write-through). `load` validates the stored value record-by-record and
//! repairs corruption in place; a corrupt or unavailable store always
//! degrades to an empty, functional cart.

use rust_decimal::Decimal;
use serde_json::Value;

use super::line_item::{CartLineItem, CartProduct};
use super::storage::CartStorage;
use crate::types::ProductId;

/// Derived cart totals. Recomputed on every read, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// `Σ(discounted_price × quantity)` over the collection.
    pub subtotal: Decimal,
    /// Total unit count across all lines.
    pub item_count: u32,
}

/// Outcome of a `load`, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records that passed the shape check.
    pub kept: usize,
    /// Records discarded by the shape check.
    pub dropped: usize,
    /// Whether the stored value was unusable as a whole and was reset.
    pub reset: bool,
}

/// In-memory line-item collection mirrored to a [`CartStorage`] backend.
pub struct CartStore<S: CartStorage> {
    items: Vec<CartLineItem>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a cart over the given storage, loading whatever it holds.
    pub async fn open(storage: S) -> Self {
        let mut store = Self {
            items: Vec::new(),
            storage,
        };
        store.load().await;
        store
    }

    /// The current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Derived totals over the current collection.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal = self
            .items
            .iter()
            .map(|line| line.discounted_price * Decimal::from(line.quantity))
            .sum();
        let item_count = self
            .items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity));
        CartTotals {
            subtotal,
            item_count,
        }
    }

    /// Add a product to the cart.
    ///
    /// An existing line with the same product id and size has its quantity
    /// incremented; otherwise a new line is appended with the discount
    /// defaulted to the list price.
    pub async fn add_item(&mut self, product: CartProduct, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.id == product.id && line.size == product.size)
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartLineItem::from_product(product, quantity));
        }
        self.save().await;
    }

    /// Remove lines for a product. With a size, only the size-qualified line
    /// goes; without one, every line for the product goes. Removing an
    /// absent product is a no-op.
    pub async fn remove_item(&mut self, id: ProductId, size: Option<&str>) {
        self.items.retain(|line| {
            line.id != id || size.is_some_and(|s| line.size.as_deref() != Some(s))
        });
        self.save().await;
    }

    /// Set the quantity of a line. A target of zero or less removes the line
    /// instead of storing a zero-quantity entry.
    pub async fn set_quantity(&mut self, id: ProductId, size: Option<&str>, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id, size).await;
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        for line in &mut self.items {
            if line.id == id && size.is_none_or(|s| line.size.as_deref() == Some(s)) {
                line.quantity = quantity;
            }
        }
        self.save().await;
    }

    /// Empty the cart and remove the persisted value.
    pub async fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.storage.clear().await {
            tracing::warn!("failed to clear cart storage: {e}");
        }
    }

    /// Read and validate the persisted cart.
    ///
    /// Recovery rules, in order:
    /// 1. No stored value: empty cart, not an error.
    /// 2. Unparseable text: corruption - discard the stored value, log, and
    ///    start empty.
    /// 3. Parsed but not a sequence: same corruption path.
    /// 4. Otherwise keep only records passing the line-item shape check;
    ///    failures are dropped and counted, never surfaced to the customer.
    /// 5. If anything was dropped, persist the cleaned collection right away
    ///    so the corruption does not reappear on the next load.
    pub async fn load(&mut self) -> LoadReport {
        let raw = match self.storage.read().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("cart storage read failed, continuing with empty cart: {e}");
                self.items.clear();
                return LoadReport::default();
            }
        };

        let Some(raw) = raw else {
            self.items.clear();
            return LoadReport::default();
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                tracing::warn!(
                    "stored cart is not a sequence ({}), resetting",
                    type_name(&other)
                );
                return self.reset_corrupted().await;
            }
            Err(e) => {
                tracing::warn!("stored cart is not valid JSON, resetting: {e}");
                return self.reset_corrupted().await;
            }
        };

        let total = entries.len();
        self.items = entries.iter().filter_map(CartLineItem::from_value).collect();
        let kept = self.items.len();
        let dropped = total - kept;

        if dropped > 0 {
            tracing::warn!(dropped, kept, "dropped invalid cart records during load");
            self.save().await;
        }

        LoadReport {
            kept,
            dropped,
            reset: false,
        }
    }

    /// Serialize the full collection and write it through to storage.
    ///
    /// A write failure leaves the in-memory cart authoritative for this
    /// session and logs a diagnostic; it never propagates.
    pub async fn save(&self) {
        let serialized = match serde_json::to_string(&self.items) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::error!("failed to serialize cart: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.write(&serialized).await {
            tracing::warn!("cart storage write failed, keeping in-memory state only: {e}");
        }
    }

    /// Discard an unusable stored value entirely and start empty.
    async fn reset_corrupted(&mut self) -> LoadReport {
        self.items.clear();
        if let Err(e) = self.storage.clear().await {
            tracing::warn!("failed to discard corrupted cart value: {e}");
        }
        LoadReport {
            kept: 0,
            dropped: 0,
            reset: true,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::MemoryStorage;
    use serde_json::json;

    fn product(id: i64, price: &str) -> CartProduct {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": price.parse::<f64>().unwrap(),
        }))
        .unwrap()
    }

    fn sized_product(id: i64, price: &str, size: &str) -> CartProduct {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": price.parse::<f64>().unwrap(),
            "size": size,
        }))
        .unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn add_item_merges_same_product_and_size() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(sized_product(1, "10.00", "M"), 1).await;
        cart.add_item(sized_product(1, "10.00", "M"), 2).await;

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[tokio::test]
    async fn add_item_keeps_sizes_on_separate_lines() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(sized_product(1, "10.00", "M"), 1).await;
        cart.add_item(sized_product(1, "10.00", "L"), 1).await;

        assert_eq!(cart.items().len(), 2);
    }

    #[tokio::test]
    async fn add_item_clamps_zero_quantity_to_one() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(product(1, "10.00"), 0).await;

        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[tokio::test]
    async fn totals_track_operations_without_drift() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(product(1, "10.50"), 2).await;
        cart.add_item(product(2, "3.25"), 1).await;
        cart.set_quantity(ProductId::new(2), None, 4).await;
        cart.remove_item(ProductId::new(1), None).await;
        cart.add_item(product(3, "1.00"), 5).await;

        let expected: Decimal = cart
            .items()
            .iter()
            .map(|line| line.discounted_price * Decimal::from(line.quantity))
            .sum();
        let totals = cart.totals();
        assert_eq!(totals.subtotal, expected);
        assert_eq!(totals.subtotal, dec("18.00"));
        assert_eq!(totals.item_count, 9);
    }

    #[tokio::test]
    async fn set_quantity_zero_or_negative_removes_line() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(product(1, "10.00"), 2).await;
        cart.set_quantity(ProductId::new(1), None, 0).await;
        assert!(cart.is_empty());

        cart.add_item(product(1, "10.00"), 2).await;
        cart.set_quantity(ProductId::new(1), None, -5).await;
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn remove_missing_product_is_a_noop() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(product(1, "10.00"), 1).await;
        cart.remove_item(ProductId::new(999), None).await;

        assert_eq!(cart.items().len(), 1);
    }

    #[tokio::test]
    async fn remove_without_size_drops_all_lines_for_product() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(sized_product(1, "10.00", "M"), 1).await;
        cart.add_item(sized_product(1, "10.00", "L"), 1).await;
        cart.add_item(product(2, "5.00"), 1).await;

        cart.remove_item(ProductId::new(1), None).await;
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id, ProductId::new(2));
    }

    #[tokio::test]
    async fn remove_with_size_drops_only_that_line() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        cart.add_item(sized_product(1, "10.00", "M"), 1).await;
        cart.add_item(sized_product(1, "10.00", "L"), 1).await;

        cart.remove_item(ProductId::new(1), Some("M")).await;
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].size.as_deref(), Some("L"));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone()).await;
        cart.add_item(sized_product(1, "10.50", "M"), 2).await;
        cart.add_item(product(2, "3.25"), 1).await;
        let before = cart.items().to_vec();

        let mut reloaded = CartStore::open(storage).await;
        let report = reloaded.load().await;
        assert_eq!(report.dropped, 0);
        assert_eq!(reloaded.items(), before.as_slice());
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage).await;
        cart.add_item(product(1, "10.00"), 1).await;

        let first = cart.load().await;
        let items_after_first = cart.items().to_vec();
        let second = cart.load().await;

        assert_eq!(first, second);
        assert_eq!(cart.items(), items_after_first.as_slice());
    }

    #[tokio::test]
    async fn empty_storage_loads_as_empty_cart() {
        let mut cart = CartStore::open(MemoryStorage::new()).await;
        let report = cart.load().await;
        assert_eq!(report, LoadReport::default());
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn unparseable_value_is_discarded_and_stays_gone() {
        let storage = MemoryStorage::with_value("{{{not json");
        let mut cart = CartStore {
            items: Vec::new(),
            storage: storage.clone(),
        };

        let report = cart.load().await;
        assert!(report.reset);
        assert!(cart.is_empty());
        assert_eq!(storage.raw(), None);

        // The next load finds a clean, empty store rather than a repeated
        // error.
        let report = cart.load().await;
        assert_eq!(report, LoadReport::default());
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn non_sequence_value_is_discarded() {
        let storage = MemoryStorage::with_value(r#"{"id": 1}"#);
        let mut cart = CartStore {
            items: Vec::new(),
            storage: storage.clone(),
        };

        let report = cart.load().await;
        assert!(report.reset);
        assert!(cart.is_empty());
        assert_eq!(storage.raw(), None);
    }

    #[tokio::test]
    async fn partially_corrupt_sequence_keeps_valid_records_and_rewrites() {
        let stored = json!([
            { "id": 1, "title": "A", "price": 1.0, "discountedPrice": 1.0, "quantity": 1 },
            { "id": 2, "title": "", "price": 1.0, "discountedPrice": 1.0, "quantity": 1 },
            { "id": 3, "title": "C", "price": 2.0, "discountedPrice": 1.5, "quantity": 2 },
            "garbage",
            { "id": 5, "title": "E", "price": 3.0, "discountedPrice": 3.0, "quantity": 1 }
        ]);
        let storage = MemoryStorage::with_value(stored.to_string());
        let mut cart = CartStore {
            items: Vec::new(),
            storage: storage.clone(),
        };

        let report = cart.load().await;
        assert_eq!(report.kept, 3);
        assert_eq!(report.dropped, 2);
        assert!(!report.reset);
        assert_eq!(cart.items().len(), 3);

        // The cleaned collection was persisted immediately: exactly the
        // three surviving records.
        let rewritten: Value = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(rewritten.as_array().unwrap().len(), 3);

        let report = cart.load().await;
        assert_eq!(report.kept, 3);
        assert_eq!(report.dropped, 0);
    }

    #[tokio::test]
    async fn storage_failure_degrades_to_in_memory_cart() {
        let storage = MemoryStorage::with_value("[]");
        storage.set_failing(true);
        let mut cart = CartStore::open(storage.clone()).await;

        // Read failed; the cart behaves as empty rather than crashing.
        assert!(cart.is_empty());

        // Mutations still work in memory while writes fail.
        cart.add_item(product(1, "10.00"), 1).await;
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.totals().subtotal, dec("10.00"));

        // Once storage recovers, the next mutation writes through again.
        storage.set_failing(false);
        cart.add_item(product(2, "5.00"), 1).await;
        let rewritten: Value = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(rewritten.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn clear_empties_cart_and_storage() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone()).await;
        cart.add_item(product(1, "10.00"), 1).await;
        assert!(storage.raw().is_some());

        cart.clear().await;
        assert!(cart.is_empty());
        assert_eq!(storage.raw(), None);
        assert_eq!(cart.totals().subtotal, Decimal::ZERO);
    }
}
