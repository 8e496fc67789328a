//! Generic record-store client for the hosted backend.
//!
//! All relational persistence (products, orders, item requests, swap
//! proposals) lives in the hosted backend and is reached over its REST
//! surface: select records from a table by equality filters, insert a
//! record, update records matching filters. Product reads are cached for
//! 5 minutes with `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::BackendConfig;

/// Cache TTL for table reads that opt into caching.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
/// Maximum number of cached queries.
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the hosted backend's table REST API.
///
/// Cheaply cloneable; clones share the HTTP client and cache.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<RecordStoreInner>,
}

struct RecordStoreInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, Arc<Vec<Value>>>,
}

impl RecordStore {
    /// Create a new record-store client.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key cannot be used as a header value
    /// or the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, RecordStoreError> {
        let mut headers = HeaderMap::new();

        let key = config.service_key.expose_secret();
        let auth_value = format!("Bearer {key}");
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| RecordStoreError::Parse(format!("Invalid service key format: {e}")))?,
        );
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| RecordStoreError::Parse(format!("Invalid service key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(RecordStoreInner {
                client,
                base_url: config.url.clone(),
                cache,
            }),
        })
    }

    /// Select records from a table matching equality filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a JSON
    /// array.
    pub async fn select(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Value>, RecordStoreError> {
        let url = self.table_url(table, filters);
        debug!(table, "record store select");

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecordStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let records: Value = response
            .json()
            .await
            .map_err(|e| RecordStoreError::Parse(e.to_string()))?;
        match records {
            Value::Array(records) => Ok(records),
            other => Err(RecordStoreError::Parse(format!(
                "expected an array of records, got {other}"
            ))),
        }
    }

    /// Like [`select`](Self::select), but served from the 5-minute cache
    /// when possible. Use for catalog reads where staleness is acceptable.
    ///
    /// # Errors
    ///
    /// Same failure modes as `select`; failures are not cached.
    pub async fn select_cached(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Value>, RecordStoreError> {
        let key = self.table_url(table, filters);
        if let Some(cached) = self.inner.cache.get(&key).await {
            debug!(table, "record store cache hit");
            return Ok(cached.as_ref().clone());
        }

        let records = self.select(table, filters).await?;
        self.inner
            .cache
            .insert(key, Arc::new(records.clone()))
            .await;
        Ok(records)
    }

    /// Insert a record into a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// record.
    pub async fn insert<T: Serialize + Sync>(
        &self,
        table: &str,
        record: &T,
    ) -> Result<(), RecordStoreError> {
        let url = self.table_url(table, &[]);
        debug!(table, "record store insert");

        let response = self
            .inner
            .client
            .post(&url)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecordStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Update records in a table matching equality filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// patch.
    pub async fn update<T: Serialize + Sync>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        patch: &T,
    ) -> Result<(), RecordStoreError> {
        let url = self.table_url(table, filters);
        debug!(table, "record store update");

        let response = self
            .inner
            .client
            .patch(&url)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecordStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Whether the backend answers at all. Used by the readiness probe.
    pub async fn is_reachable(&self) -> bool {
        let url = format!("{}/rest/v1/", self.inner.base_url);
        match self.inner.client.head(&url).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(_) => false,
        }
    }

    /// Build a table URL with `column=eq.value` equality filters.
    fn table_url(&self, table: &str, filters: &[(&str, &str)]) -> String {
        let mut url = format!("{}/rest/v1/{table}", self.inner.base_url);
        for (i, (column, value)) in filters.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            url.push(sep);
            url.push_str(column);
            url.push_str("=eq.");
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn store() -> RecordStore {
        RecordStore::new(&BackendConfig {
            url: "https://backend.test".to_string(),
            service_key: SecretString::from("k3y-4bcdefgh1jklmn0pqrstuvwxyz!@"),
        })
        .unwrap()
    }

    #[test]
    fn table_url_without_filters() {
        assert_eq!(
            store().table_url("products", &[]),
            "https://backend.test/rest/v1/products"
        );
    }

    #[test]
    fn table_url_encodes_filters() {
        let url = store().table_url(
            "products",
            &[("category", "flight jackets"), ("status", "active")],
        );
        assert_eq!(
            url,
            "https://backend.test/rest/v1/products?category=eq.flight%20jackets&status=eq.active"
        );
    }
}
