//! Publish-side client for the hosted JSON document store.
//!
//! The remote side is a JSONBin-compatible API: a whole-document `PUT`
//! guarded by a write secret in the `X-Master-Key` header. Publication is
//! fire-and-forget - no retries; a failure is surfaced to the admin as a
//! notice and must be re-triggered manually.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use vitrine_core::config::StoreConfig;

/// Request timeout for document store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors when publishing the store document.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Publication settings are incomplete.
    #[error("remote document id and write secret are required to publish")]
    MissingCredentials,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document store refused the write.
    #[error("document store returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Error body returned by the document store.
#[derive(Debug, Deserialize)]
struct DocStoreErrorBody {
    message: Option<String>,
}

/// Client for whole-document writes against the document store.
#[derive(Clone)]
pub struct DocStoreClient {
    inner: Arc<DocStoreClientInner>,
}

struct DocStoreClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl DocStoreClient {
    /// Create a new publish client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(DocStoreClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Replace the whole remote document with `config`.
    ///
    /// Requires a non-empty document id and write secret. Never retries.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] on missing credentials, network failure,
    /// or a non-2xx response.
    #[instrument(skip(self, config, write_secret), fields(doc_id))]
    pub async fn publish(
        &self,
        config: &StoreConfig,
        doc_id: &str,
        write_secret: &SecretString,
    ) -> Result<(), PublishError> {
        if doc_id.trim().is_empty() || write_secret.expose_secret().trim().is_empty() {
            return Err(PublishError::MissingCredentials);
        }

        let url = format!("{}/{doc_id}", self.inner.base_url);
        let response = self
            .inner
            .client
            .put(&url)
            .header("Content-Type", "application/json")
            .header("X-Master-Key", write_secret.expose_secret())
            .json(config)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(%status, "store document published");
            return Ok(());
        }

        // Read the body as text first for better diagnostics
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<DocStoreErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        tracing::error!(%status, %message, "document store rejected the publish");
        Err(PublishError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
