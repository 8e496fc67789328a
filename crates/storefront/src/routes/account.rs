//! Signed-in account routes.

use axum::{Json, extract::State};
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// List the signed-in customer's orders.
///
/// Records are passed through as stored; the frontend owns their shape.
#[instrument(skip(state, user))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Value>>> {
    let user_filter = user.id.to_string();
    let records = state
        .records()
        .select("orders", &[("user_id", &user_filter)])
        .await?;
    Ok(Json(records))
}
