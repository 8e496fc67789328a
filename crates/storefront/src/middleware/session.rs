//! Session layer configuration.
//!
//! tower-sessions over the in-process memory store. The session holds the
//! signed-in user (when there is one) and the serialized cart; swapping in
//! a persistent store is a deployment decision, not a code change.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::{SameSite, time::Duration};

use crate::config::StorefrontConfig;

pub const SESSION_COOKIE_NAME: &str = "pw_session";

/// Build the session layer. The cookie is marked secure only when the
/// public base URL is https, so local development keeps working.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
