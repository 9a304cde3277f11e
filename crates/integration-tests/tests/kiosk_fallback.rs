//! Kiosk resilience: a failed fetch with a warm cache keeps the menu up.
//!
//! The document store endpoints point at an unroutable loopback port, so
//! every fetch fails fast without touching the network.

use std::path::PathBuf;

use secrecy::SecretString;

use vitrine_integration_tests::temp_store_path;

use vitrine_admin::docstore::{DocStoreClient as PublishClient, PublishError};
use vitrine_core::config::StoreConfig;
use vitrine_kiosk::config::KioskConfig;
use vitrine_kiosk::db::LocalStore;
use vitrine_kiosk::state::AppState;

const UNROUTABLE: &str = "http://127.0.0.1:1";

fn kiosk_state(store: LocalStore) -> AppState {
    let config = KioskConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        data_dir: PathBuf::from("/tmp"),
        docstore_base_url: UNROUTABLE.to_string(),
        remote_doc_id: "doc-1".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    AppState::new(config, store).expect("state builds")
}

// =============================================================================
// Fetch Fallback
// =============================================================================

#[tokio::test]
async fn test_warm_cache_survives_a_fetch_failure() {
    let store = LocalStore::open(&temp_store_path("warm-cache")).expect("store opens");

    // A previously successful fetch left a snapshot behind
    let mut published = StoreConfig::template();
    published.operations.store_name = "Cantina da Ana".to_string();
    store.save_snapshot(&published).expect("snapshot saved");

    let state = kiosk_state(store);

    // The fetch fails, but the kiosk renders from the cache - no outage
    let document = state
        .current_document()
        .await
        .expect("cached snapshot serves the menu");
    assert_eq!(document.operations.store_name, "Cantina da Ana");
}

#[tokio::test]
async fn test_cold_cache_fetch_failure_means_unavailable() {
    let store = LocalStore::open(&temp_store_path("cold-cache")).expect("store opens");
    let state = kiosk_state(store);

    assert!(state.current_document().await.is_err());
}

#[tokio::test]
async fn test_cached_snapshot_keeps_fields_the_template_lacks() {
    let store = LocalStore::open(&temp_store_path("rich-cache")).expect("store opens");

    // A snapshot published by a newer admin carries sections this kiosk
    // has never heard of; serving from cache must not shed them
    let mut published = StoreConfig::template();
    published.extra.insert(
        "loyaltyProgram".to_string(),
        serde_json::json!({"enabled": true}),
    );
    store.save_snapshot(&published).expect("snapshot saved");

    let state = kiosk_state(store);
    let document = state.current_document().await.expect("cache serves");

    assert_eq!(document.extra["loyaltyProgram"]["enabled"], true);
}

// =============================================================================
// Publish Failures
// =============================================================================

#[tokio::test]
async fn test_publish_surfaces_network_failure_without_retrying() {
    let client = PublishClient::new(UNROUTABLE).expect("client builds");
    let config = StoreConfig::template();

    let err = client
        .publish(&config, "doc-1", &SecretString::from("chave"))
        .await
        .expect_err("unroutable endpoint");
    assert!(matches!(err, PublishError::Http(_)));
}

#[tokio::test]
async fn test_publish_requires_both_credentials() {
    let client = PublishClient::new(UNROUTABLE).expect("client builds");
    let config = StoreConfig::template();

    for (doc_id, secret) in [("", "chave"), ("doc-1", ""), ("", "")] {
        let err = client
            .publish(&config, doc_id, &SecretString::from(secret))
            .await
            .expect_err("missing credentials");
        assert!(matches!(err, PublishError::MissingCredentials));
    }
}
