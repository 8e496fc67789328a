//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachability)
//!
//! # Products
//! GET  /products               - Product listing (optional ?category=)
//! GET  /products/{id}          - Product detail
//! POST /products/{id}/request  - Item-request notification
//!
//! # Cart (JSON)
//! GET  /cart                   - Current cart
//! POST /cart/add               - Add item
//! POST /cart/update            - Set line quantity (<= 0 removes)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge value
//!
//! # Checkout
//! POST /checkout               - Snapshot cart into an order, clear cart
//!
//! # Account (signed-in)
//! GET  /account/orders         - Order history for the current user
//!
//! # Sizing
//! POST /api/size-recommendation - Size recommendation from measurements
//! ```

pub mod account;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod sizing;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/request", post(products::request_item))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health checks
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::checkout))
        // Account
        .route("/account/orders", get(account::orders))
        // Sizing
        .route("/api/size-recommendation", post(sizing::recommend))
}

/// Build the complete application with the session layer applied.
///
/// Sentry and tracing layers are added by the binary; tests drive this
/// router directly.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes())
        .layer(session_layer)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies hosted-backend reachability before returning OK.
/// Returns 503 Service Unavailable if the backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.records().is_reachable().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
