//! Read-side client for the hosted JSON document store.
//!
//! Fetches the latest published revision of the store document. Responses
//! are cached in memory with a short TTL so the menu does not refetch on
//! every request; the persistent fallback cache is the caller's job.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use vitrine_core::config::{StoreConfig, migrate};

/// Request timeout for document store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// In-memory snapshot cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Errors when fetching the store document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document store refused the read.
    #[error("document store returned {0}")]
    Rejected(u16),

    /// The response carried no document payload.
    #[error("response has no record payload")]
    MissingRecord,

    /// The document payload did not parse.
    #[error("unreadable document payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for latest-revision reads against the document store.
#[derive(Clone)]
pub struct DocStoreClient {
    inner: Arc<DocStoreClientInner>,
}

struct DocStoreClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, StoreConfig>,
}

impl DocStoreClient {
    /// Create a new fetch client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(DocStoreClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Fetch the latest published store document.
    ///
    /// The response's `record` field is unwrapped, migrated to the current
    /// schema version, and deserialized wholesale. Never retries; the
    /// caller falls back to its persistent cache on failure.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network failure, a non-2xx response, or
    /// an unreadable payload.
    #[instrument(skip(self))]
    pub async fn fetch_latest(&self, doc_id: &str) -> Result<StoreConfig, FetchError> {
        if let Some(hit) = self.inner.cache.get(doc_id).await {
            tracing::debug!("serving store document from the TTL cache");
            return Ok(hit);
        }

        let url = format!("{}/{doc_id}/latest", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "document store refused the read");
            return Err(FetchError::Rejected(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let record = body
            .get("record")
            .cloned()
            .ok_or(FetchError::MissingRecord)?;

        let config: StoreConfig = serde_json::from_value(migrate::migrate_to_current(record))?;

        self.inner
            .cache
            .insert(doc_id.to_string(), config.clone())
            .await;
        tracing::info!("store document fetched");

        Ok(config)
    }

    /// Drop the cached snapshot so the next fetch goes to the network.
    pub async fn invalidate(&self, doc_id: &str) {
        self.inner.cache.invalidate(doc_id).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_network_failure_is_a_fetch_error() {
        // Unroutable loopback port: the request fails without retrying
        let client = DocStoreClient::new("http://127.0.0.1:1").unwrap();

        let err = client.fetch_latest("doc-1").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[tokio::test]
    async fn test_invalidate_is_safe_on_a_cold_cache() {
        let client = DocStoreClient::new("http://127.0.0.1:1").unwrap();
        client.invalidate("doc-1").await;
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = DocStoreClient::new("https://docstore.invalid/v3/b/").unwrap();
        assert_eq!(client.inner.base_url, "https://docstore.invalid/v3/b");
    }
}
