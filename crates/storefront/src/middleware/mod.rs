//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-process store)

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth};
pub use session::create_session_layer;
