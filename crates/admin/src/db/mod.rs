//! Local document store.
//!
//! One embedded `redb` database file holds the whole serialized store
//! document under a single key - the same contract the original system had
//! with browser local storage. Writes are synchronous and last-writer-wins;
//! two admin processes sharing a data directory will clobber each other,
//! which is an accepted limitation.

use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition};
use thiserror::Error;

use vitrine_core::config::StoreConfig;

/// Table holding serialized documents keyed by name.
const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

/// Key of the store document.
const CONFIG_KEY: &str = "store_config";

/// Errors from the local document store.
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

/// Embedded local store for the admin console.
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

        tracing::debug!(path = %path.display(), "local store ready");

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

    /// Load the raw serialized store document, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on storage failure or non-UTF-8 content.
    pub fn load_raw(&self) -> Result<Option<String>, PersistError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS)?;
        match table.get(CONFIG_KEY)? {
            Some(value) => {
                let text = String::from_utf8_lossy(value.value()).into_owned();
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    /// Persist the store document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on serialization or storage failure; the
    /// caller reports it as a notice, never as a fatal fault.
    pub fn save_config(&self, config: &StoreConfig) -> Result<(), PersistError> {
        let text = serde_json::to_string(config)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOCUMENTS)?;
            table.insert(CONFIG_KEY, text.as_bytes())?;
        }
        write_txn.commit()?;

        tracing::debug!("store document saved locally");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> LocalStore {
        let path = std::env::temp_dir()
            .join("vitrine-admin-db-tests")
            .join(format!("{name}-{}.redb", std::process::id()));
        let _ = std::fs::remove_file(&path);
        LocalStore::open(&path).unwrap()
    }

    #[test]
    fn test_load_before_first_save_is_none() {
        let store = temp_store("empty");
        assert!(store.load_raw().unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let store = temp_store("round-trip");
        let config = StoreConfig::template();

        store.save_config(&config).unwrap();

        let raw = store.load_raw().unwrap().unwrap();
        let back: StoreConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_save_is_last_writer_wins() {
        let store = temp_store("last-writer");
        let mut config = StoreConfig::template();

        store.save_config(&config).unwrap();
        config.operations.store_name = "Cantina da Ana".to_string();
        store.save_config(&config).unwrap();

        let raw = store.load_raw().unwrap().unwrap();
        let back: StoreConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.operations.store_name, "Cantina da Ana");
    }
}
