//! Checkout: snapshot the cart into an order record.
//!
//! Payment itself is handled by the external payment provider after the
//! order record exists; this handler only persists the snapshot and empties
//! the cart.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

use super::cart::{format_price, open_cart};

/// Checkout response body.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub subtotal: String,
    pub item_count: u32,
}

/// Create an order from the current cart and clear it.
#[instrument(skip(state, user, session))]
pub async fn checkout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Json<CheckoutResponse>> {
    let mut cart = open_cart(session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let totals = cart.totals();
    let order = json!({
        "user_id": user.map(|u| u.id),
        "items": cart.items(),
        "subtotal": totals.subtotal,
        "status": "pending",
        "created_at": chrono::Utc::now(),
    });
    state.records().insert("orders", &order).await?;

    // One-of-a-kind listings: mark them reserved so they drop out of the
    // active catalog while the order is pending. Best effort; a listing
    // that stays visible is recoverable, a lost order is not.
    for line in cart.items() {
        let id_filter = line.id.to_string();
        if let Err(e) = state
            .records()
            .update(
                "products",
                &[("id", &id_filter)],
                &json!({ "status": "reserved" }),
            )
            .await
        {
            tracing::warn!(product_id = %line.id, "failed to reserve product: {e}");
        }
    }

    // The cart is only emptied once the order record exists.
    cart.clear().await;

    Ok(Json(CheckoutResponse {
        subtotal: format_price(totals.subtotal),
        item_count: totals.item_count,
    }))
}
