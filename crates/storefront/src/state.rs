//! Shared application state.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::records::{RecordStore, RecordStoreError};

/// Handles shared by every request: configuration and the record-store
/// client. Clones are cheap (one `Arc`).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    records: RecordStore,
}

impl AppState {
    /// Build the state, constructing the record-store client from the
    /// backend configuration.
    ///
    /// # Errors
    ///
    /// Fails when the backend service key is not usable as an HTTP header
    /// or the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, RecordStoreError> {
        let records = RecordStore::new(&config.backend)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, records }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn records(&self) -> &RecordStore {
        &self.inner.records
    }
}
