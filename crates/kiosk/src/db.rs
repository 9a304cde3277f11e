//! Local cache store for the kiosk.
//!
//! One embedded `redb` database file with two keys: the last successfully
//! fetched store snapshot (the offline fallback) and the in-progress cart
//! (so a kiosk restart does not lose an order being assembled).

use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition};
use thiserror::Error;

use vitrine_core::cart::Cart;
use vitrine_core::config::StoreConfig;

/// Table holding serialized documents keyed by name.
const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

/// Key of the cached store snapshot.
const SNAPSHOT_KEY: &str = "store_snapshot";

/// Key of the persisted kiosk cart.
const CART_KEY: &str = "kiosk_cart";

/// Errors from the local cache store.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("storage error: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("storage error: {0}")]
    Table(#[from] redb::TableError),
    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("storage error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Embedded local store for the kiosk.
pub struct LocalStore {
    db: Database,
    path: PathBuf,
}

impl LocalStore {
    /// Open (or create) the store at the given path, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the directory or database cannot be
    /// created.
    pub fn open(path: &Path) -> Result<Self, PersistError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;

        // Ensure the table exists so first reads don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DOCUMENTS)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "local cache store ready");

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// The database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the raw cached store snapshot, if any fetch ever succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on storage failure.
    pub fn load_snapshot(&self) -> Result<Option<String>, PersistError> {
        self.get_raw(SNAPSHOT_KEY)
    }

    /// Cache a freshly fetched store snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on serialization or storage failure.
    pub fn save_snapshot(&self, config: &StoreConfig) -> Result<(), PersistError> {
        let text = serde_json::to_string(config)?;
        self.put_raw(SNAPSHOT_KEY, &text)
    }

    /// Load the persisted cart. A corrupt cart is discarded, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on storage failure.
    pub fn load_cart(&self) -> Result<Option<Cart>, PersistError> {
        let Some(text) = self.get_raw(CART_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(cart) => Ok(Some(cart)),
            Err(e) => {
                tracing::warn!("discarding unreadable persisted cart: {e}");
                Ok(None)
            }
        }
    }

    /// Persist the cart under its own key.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on serialization or storage failure.
    pub fn save_cart(&self, cart: &Cart) -> Result<(), PersistError> {
        let text = serde_json::to_string(cart)?;
        self.put_raw(CART_KEY, &text)
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>, PersistError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS)?;
        match table.get(key)? {
            Some(value) => Ok(Some(String::from_utf8_lossy(value.value()).into_owned())),
            None => Ok(None),
        }
    }

    fn put_raw(&self, key: &str, text: &str) -> Result<(), PersistError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOCUMENTS)?;
            table.insert(key, text.as_bytes())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vitrine_core::types::StoreStatus;

    fn temp_store(name: &str) -> LocalStore {
        let path = std::env::temp_dir()
            .join("vitrine-kiosk-db-tests")
            .join(format!("{name}-{}.redb", std::process::id()));
        let _ = std::fs::remove_file(&path);
        LocalStore::open(&path).unwrap()
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = temp_store("snapshot");
        assert!(store.load_snapshot().unwrap().is_none());

        let config = StoreConfig::template();
        store.save_snapshot(&config).unwrap();

        let raw = store.load_snapshot().unwrap().unwrap();
        let back: StoreConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_cart_round_trip_and_separate_key() {
        let store = temp_store("cart");
        let config = StoreConfig::template();
        let product = &config.products[0];

        let mut cart = Cart::new();
        cart.add_item(product, product.stock, StoreStatus::Open)
            .unwrap();
        store.save_cart(&cart).unwrap();

        let back = store.load_cart().unwrap().unwrap();
        assert_eq!(back, cart);

        // The cart key never shadows the snapshot key
        assert!(store.load_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_cart_is_discarded() {
        let store = temp_store("corrupt-cart");
        store.put_raw(CART_KEY, "{broken").unwrap();
        assert!(store.load_cart().unwrap().is_none());
    }
}
