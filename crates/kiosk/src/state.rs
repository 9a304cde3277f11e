//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use vitrine_core::cart::Cart;
use vitrine_core::config::{StoreConfig, load_or_default};

use crate::config::KioskConfig;
use crate::db::LocalStore;
use crate::docstore::{DocStoreClient, FetchError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. One kiosk device serves one
/// customer at a time, so there is a single cart behind a lock rather than
/// per-session carts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: KioskConfig,
    store: LocalStore,
    docstore: DocStoreClient,
    cart: RwLock<Cart>,
}

impl AppState {
    /// Create a new application state, restoring any persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch client cannot be built.
    pub fn new(config: KioskConfig, store: LocalStore) -> Result<Self, reqwest::Error> {
        let docstore = DocStoreClient::new(&config.docstore_base_url)?;

        let cart = match store.load_cart() {
            Ok(Some(cart)) => {
                tracing::info!(items = cart.item_count(), "restored persisted cart");
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!("could not restore the persisted cart: {e}");
                Cart::new()
            }
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                docstore,
                cart: RwLock::new(cart),
            }),
        })
    }

    /// Get a reference to the kiosk configuration.
    #[must_use]
    pub fn config(&self) -> &KioskConfig {
        &self.inner.config
    }

    /// Get a reference to the fetch client.
    #[must_use]
    pub fn docstore(&self) -> &DocStoreClient {
        &self.inner.docstore
    }

    /// Get the kiosk cart.
    #[must_use]
    pub fn cart(&self) -> &RwLock<Cart> {
        &self.inner.cart
    }

    /// Resolve the current store document.
    ///
    /// A successful fetch updates the persistent fallback cache. When the
    /// fetch fails and a cached snapshot exists, the kiosk keeps serving
    /// from it (reconciled against the template) instead of going dark;
    /// only a failure with a cold cache is surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the fetch fails and no cached snapshot
    /// is available.
    pub async fn current_document(&self) -> Result<StoreConfig, FetchError> {
        match self
            .inner
            .docstore
            .fetch_latest(&self.inner.config.remote_doc_id)
            .await
        {
            Ok(config) => {
                if let Err(e) = self.inner.store.save_snapshot(&config) {
                    tracing::warn!("could not cache the fetched snapshot: {e}");
                }
                Ok(config)
            }
            Err(fetch_err) => {
                tracing::warn!("fetch failed, trying the cached snapshot: {fetch_err}");
                match self.inner.store.load_snapshot() {
                    Ok(Some(text)) => {
                        Ok(load_or_default(Some(&text), &StoreConfig::template()))
                    }
                    Ok(None) => Err(fetch_err),
                    Err(e) => {
                        tracing::error!("cached snapshot unreadable: {e}");
                        Err(fetch_err)
                    }
                }
            }
        }
    }

    /// Persist the cart; failures are logged, never fatal.
    pub async fn persist_cart(&self) {
        let cart = self.inner.cart.read().await;
        if let Err(e) = self.inner.store.save_cart(&cart) {
            tracing::warn!("could not persist the cart: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vitrine_core::types::StoreStatus;

    fn test_state(name: &str) -> AppState {
        let path = std::env::temp_dir()
            .join("vitrine-kiosk-state-tests")
            .join(format!("{name}-{}.redb", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let config = KioskConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: PathBuf::from("/tmp"),
            // Unroutable: every fetch fails fast
            docstore_base_url: "http://127.0.0.1:1".to_string(),
            remote_doc_id: "doc-1".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let store = LocalStore::open(&path).unwrap();
        AppState::new(config, store).unwrap()
    }

    #[tokio::test]
    async fn test_cold_cache_fetch_failure_is_surfaced() {
        let state = test_state("cold-cache");
        assert!(state.current_document().await.is_err());
    }

    #[tokio::test]
    async fn test_cart_survives_a_restart() {
        let path = std::env::temp_dir()
            .join("vitrine-kiosk-state-tests")
            .join(format!("restart-{}.redb", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = StoreConfig::template();
        let product = &config.products[0];

        {
            let store = LocalStore::open(&path).unwrap();
            let mut cart = Cart::new();
            cart.add_item(product, product.stock, StoreStatus::Open)
                .unwrap();
            store.save_cart(&cart).unwrap();
        }

        let kiosk_config = KioskConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: PathBuf::from("/tmp"),
            docstore_base_url: "http://127.0.0.1:1".to_string(),
            remote_doc_id: "doc-1".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(kiosk_config, LocalStore::open(&path).unwrap()).unwrap();

        assert_eq!(state.cart().read().await.item_count(), 1);
    }
}
