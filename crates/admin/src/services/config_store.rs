//! The config store service: load, persist, export, import.
//!
//! Glue between the pure document logic in `vitrine-core` and the local
//! persistence layer. Loading never fails: an unreadable or missing cache
//! falls back to the built-in template.

use chrono::{DateTime, Utc};

use vitrine_core::config::{ImportError, StoreConfig, load_or_default};

use crate::db::{LocalStore, PersistError};

/// Owns load/persist for the admin's working document.
pub struct ConfigStore {
    store: LocalStore,
}

impl ConfigStore {
    /// Wrap a local store.
    #[must_use]
    pub const fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The underlying local store.
    #[must_use]
    pub const fn local(&self) -> &LocalStore {
        &self.store
    }

    /// Load the working document.
    ///
    /// The cached copy is reconciled against the built-in template so new
    /// template fields are never lost. A missing or unreadable cache falls
    /// back to the template; this never fails.
    #[must_use]
    pub fn load(&self) -> StoreConfig {
        let cached = match self.store.load_raw() {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("unreadable local document, using the template: {e}");
                None
            }
        };
        load_or_default(cached.as_deref(), &StoreConfig::template())
    }

    /// Persist the working document locally.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on serialization or storage failure.
    pub fn persist(&self, config: &StoreConfig) -> Result<(), PersistError> {
        self.store.save_config(config)
    }

    /// Parse an imported snapshot for wholesale replacement.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the file is malformed or incomplete.
    pub fn import(text: &str) -> Result<StoreConfig, ImportError> {
        StoreConfig::import_snapshot(text)
    }

    /// File name for an exported snapshot, stamped with the current date.
    #[must_use]
    pub fn export_file_name(now: DateTime<Utc>) -> String {
        format!("vitrine-backup-{}.json", now.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_config_store(name: &str) -> ConfigStore {
        let path = std::env::temp_dir()
            .join("vitrine-admin-service-tests")
            .join(format!("{name}-{}.redb", std::process::id()));
        let _ = std::fs::remove_file(&path);
        ConfigStore::new(LocalStore::open(&path).unwrap())
    }

    #[test]
    fn test_load_without_cache_yields_template() {
        let service = temp_config_store("fresh");
        assert_eq!(service.load(), StoreConfig::template());
    }

    #[test]
    fn test_persist_then_load_round_trips() {
        let service = temp_config_store("persist");
        let mut config = StoreConfig::template();
        config.operations.store_name = "Cantina da Ana".to_string();

        service.persist(&config).unwrap();

        assert_eq!(service.load().operations.store_name, "Cantina da Ana");
    }

    #[test]
    fn test_export_file_name_carries_the_date() {
        let now = Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap();
        assert_eq!(
            ConfigStore::export_file_name(now),
            "vitrine-backup-2026-08-05.json"
        );
    }
}
