//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `config_reconcile` - Document migration and reconciliation properties
//! - `catalog_cart` - Catalog projection and cart state machine scenarios
//! - `checkout_flow` - The delivery checkout scenario end to end
//! - `kiosk_fallback` - Kiosk cache fallback when the remote fetch fails
//!
//! Everything runs against temp-file stores and unroutable loopback
//! endpoints - no network or external services are required.

use std::path::PathBuf;

/// A unique temp path for a test's embedded store.
#[must_use]
pub fn temp_store_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join("vitrine-integration-tests")
        .join(format!("{name}-{}.redb", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}
