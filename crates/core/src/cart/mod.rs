//! Shopping cart state and durable mirroring.
//!
//! The cart is a single ordered collection of [`CartLineItem`]s owned by
//! [`CartStore`]. Every mutation is written through to a [`CartStorage`]
//! backend as one serialized JSON value; on load the stored value is parsed
//! and validated record-by-record, and anything that fails the shape check
//! is discarded and the cleaned collection re-persisted.
//!
//! Storage failures never escape: the store degrades to an empty, in-memory
//! cart and logs a diagnostic.

mod line_item;
mod storage;
mod store;

pub use line_item::{CartLineItem, CartProduct, ProductImages};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::{CartStore, CartTotals, LoadReport};
