//! Data models for the storefront.

pub mod product;
pub mod session;

pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
