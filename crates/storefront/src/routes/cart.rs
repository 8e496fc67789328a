//! Cart route handlers.
//!
//! The cart is owned by the core `CartStore`; the session is its durable
//! storage, with one key holding the whole serialized collection. Every
//! handler opens the store (which validates and repairs whatever the
//! session holds), applies one operation, and returns the resulting cart
//! view. Storage trouble degrades to an empty cart, never a 5xx.

use axum::{Json, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use pilot_wardrobe_core::ProductId;
use pilot_wardrobe_core::cart::{CartProduct, CartStorage, CartStore, StorageError};

use crate::models::session_keys;

/// Session-backed cart storage.
///
/// One session key, whole-value reads and writes, exactly the contract the
/// core store expects from durable storage.
pub(crate) struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    pub(crate) const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        self.session
            .get::<String>(session_keys::CART)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn write(&self, value: &str) -> Result<(), StorageError> {
        self.session
            .insert(session_keys::CART, value.to_owned())
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.session
            .remove::<String>(session_keys::CART)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::new(e.to_string()))
    }
}

/// Open the session-backed cart store.
pub(crate) async fn open_cart(session: Session) -> CartStore<SessionStorage> {
    CartStore::open(SessionStorage::new(session)).await
}

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub size: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

/// Format a decimal amount as a price string.
pub(crate) fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl CartView {
    fn from_store(store: &CartStore<SessionStorage>) -> Self {
        let totals = store.totals();
        Self {
            items: store
                .items()
                .iter()
                .map(|line| CartItemView {
                    id: line.id,
                    title: line.title.clone(),
                    size: line.size.clone(),
                    quantity: line.quantity,
                    price: format_price(line.discounted_price),
                    line_price: format_price(
                        line.discounted_price * Decimal::from(line.quantity),
                    ),
                    image: line
                        .images
                        .as_ref()
                        .and_then(|images| images.thumbnails.first().cloned()),
                })
                .collect(),
            subtotal: format_price(totals.subtotal),
            item_count: totals.item_count,
        }
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product: CartProduct,
    pub quantity: Option<u32>,
}

/// Update cart quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub id: ProductId,
    pub size: Option<String>,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub id: ProductId,
    pub size: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the current cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = open_cart(session).await;
    Json(CartView::from_store(&cart))
}

/// Add an item to the cart.
#[instrument(skip(session, request))]
pub async fn add(session: Session, Json(request): Json<AddToCartRequest>) -> impl IntoResponse {
    let mut cart = open_cart(session).await;
    cart.add_item(request.product, request.quantity.unwrap_or(1))
        .await;
    Json(CartView::from_store(&cart))
}

/// Update a line's quantity. Zero or negative removes the line.
#[instrument(skip(session, request))]
pub async fn update(session: Session, Json(request): Json<UpdateCartRequest>) -> impl IntoResponse {
    let mut cart = open_cart(session).await;
    cart.set_quantity(request.id, request.size.as_deref(), request.quantity)
        .await;
    Json(CartView::from_store(&cart))
}

/// Remove an item from the cart.
#[instrument(skip(session, request))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> impl IntoResponse {
    let mut cart = open_cart(session).await;
    cart.remove_item(request.id, request.size.as_deref()).await;
    Json(CartView::from_store(&cart))
}

/// Empty the cart. The confirmation prompt is the frontend's concern.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> impl IntoResponse {
    let mut cart = open_cart(session).await;
    cart.clear().await;
    Json(CartView::from_store(&cart))
}

/// Return the cart count badge value.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = open_cart(session).await;
    Json(CartCountView {
        count: cart.totals().item_count,
    })
}
