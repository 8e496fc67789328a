//! Product route handlers.
//!
//! Straight CRUD glue over the hosted backend's `products` table.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::state::AppState;

/// Catalog filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// List active products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>> {
    let mut filters: Vec<(&str, &str)> = vec![("status", "active")];
    if let Some(category) = query.category.as_deref() {
        filters.push(("category", category));
    }

    let records = state.records().select_cached("products", &filters).await?;
    let products = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(e) => {
                // A malformed catalog row should not take the listing down.
                tracing::warn!("skipping malformed product record: {e}");
                None
            }
        })
        .collect();

    Ok(Json(products))
}

/// Fetch one product by id.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let id_filter = id.to_string();
    let records = state
        .records()
        .select("products", &[("id", &id_filter)])
        .await?;

    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let product = serde_json::from_value(record)
        .map_err(|e| AppError::Internal(format!("malformed product record {id}: {e}")))?;

    Ok(Json(product))
}

/// Ask to be notified about a product (back in stock, size available).
///
/// The request is tagged with the current user id when one is signed in;
/// anonymous requests are stored without one.
#[instrument(skip(state, user))]
pub async fn request_item(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let record = json!({
        "product_id": id,
        "user_id": user.map(|u| u.id),
        "requested_at": chrono::Utc::now(),
    });
    state.records().insert("item_requests", &record).await?;

    Ok(StatusCode::CREATED)
}
