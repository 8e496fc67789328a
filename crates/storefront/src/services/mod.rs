//! External service clients.

pub mod records;

pub use records::{RecordStore, RecordStoreError};
