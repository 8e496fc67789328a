//! Session-related types.
//!
//! Types stored in the session for authentication state and the cart.

use serde::{Deserialize, Serialize};

use pilot_wardrobe_core::UserId;

/// Session-stored user identity.
///
/// Minimal data identifying the signed-in user. The external identity
/// provider's callback flow populates this; the storefront itself never
/// verifies credentials. The cart and size engine work identically whether
/// this is present or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// User's email address.
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key holding the whole serialized cart collection.
    pub const CART: &str = "cart";
}
