//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use vitrine_core::config::StoreConfig;

use crate::config::AdminConfig;
use crate::db::PersistError;
use crate::docstore::DocStoreClient;
use crate::services::ConfigStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// working document, the local store, and the publish client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    config_store: ConfigStore,
    document: RwLock<StoreConfig>,
    publish_in_flight: AtomicBool,
    docstore: DocStoreClient,
}

impl AppState {
    /// Create a new application state, loading the working document from
    /// the local store (or the template).
    ///
    /// # Errors
    ///
    /// Returns an error if the publish client cannot be built.
    pub fn new(config: AdminConfig, config_store: ConfigStore) -> Result<Self, reqwest::Error> {
        let docstore = DocStoreClient::new(&config.docstore_base_url)?;
        let document = RwLock::new(config_store.load());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                config_store,
                document,
                publish_in_flight: AtomicBool::new(false),
                docstore,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the working store document.
    #[must_use]
    pub fn document(&self) -> &RwLock<StoreConfig> {
        &self.inner.document
    }

    /// Get a reference to the publish client.
    #[must_use]
    pub fn docstore(&self) -> &DocStoreClient {
        &self.inner.docstore
    }

    /// Persist the current working document to the local store.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on serialization or storage failure.
    pub async fn persist(&self) -> Result<(), PersistError> {
        let document = self.inner.document.read().await;
        self.inner.config_store.persist(&document)
    }

    /// Mark a publish as started; false when one is already in flight.
    ///
    /// Overlapping publishes are refused rather than queued - the admin
    /// must wait for the running one and re-trigger manually.
    #[must_use]
    pub fn begin_publish(&self) -> bool {
        self.inner
            .publish_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the running publish as finished.
    pub fn end_publish(&self) {
        self.inner.publish_in_flight.store(false, Ordering::Release);
    }
}
