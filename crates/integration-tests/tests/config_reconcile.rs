//! Integration tests for document migration and reconciliation.
//!
//! These exercise the load path the admin and the kiosk share: a cached
//! document of any age is migrated, merged against the template, and never
//! loses a field from either side.

use serde_json::{Value, json};

use vitrine_core::config::{SCHEMA_VERSION, StoreConfig, load_or_default, migrate, reconcile};
use vitrine_core::types::StoreStatus;

// =============================================================================
// Reconciliation Properties
// =============================================================================

#[test]
fn test_no_template_key_is_dropped_by_an_old_cache() {
    let template = StoreConfig::template();
    // A minimal, older cached document that predates most template fields
    let cached = json!({
        "schemaVersion": 2,
        "operations": {"status": "closed"}
    })
    .to_string();

    let config = load_or_default(Some(&cached), &template);

    // Cached value wins...
    assert_eq!(config.operations.status, StoreStatus::Closed);
    // ...while every template field the cache lacked is still there
    assert_eq!(
        config.operations.contact_number,
        template.operations.contact_number
    );
    assert_eq!(config.appearance, template.appearance);
    assert_eq!(config.categories, template.categories);
    assert_eq!(config.products, template.products);
    assert_eq!(config.coverage_areas, template.coverage_areas);
}

#[test]
fn test_no_cached_key_is_dropped_by_the_template() {
    let template = StoreConfig::template();
    let cached = json!({
        "schemaVersion": 2,
        "operations": {"status": "open", "futureField": "kept"},
        "newTopLevelSection": {"alsoKept": 1}
    })
    .to_string();

    let config = load_or_default(Some(&cached), &template);

    assert_eq!(config.operations.extra["futureField"], "kept");
    assert_eq!(config.extra["newTopLevelSection"]["alsoKept"], 1);

    // The unknown keys survive a full serialize cycle too
    let out = serde_json::to_value(&config).expect("serializes");
    assert_eq!(out["operations"]["futureField"], "kept");
    assert_eq!(out["newTopLevelSection"]["alsoKept"], 1);
}

#[test]
fn test_reconcile_is_shallow_at_the_top_and_deep_per_group() {
    let cached = json!({
        "payment": {"pixKey": "loja@exemplo.com"},
        "products": [{"id": "prod-9", "name": "Suco", "price": 6.0, "stock": 1}]
    });
    let template = serde_json::to_value(StoreConfig::template()).expect("serializes");

    let merged = reconcile(cached, template);

    // Group merge: the template's other payment fields survive
    assert_eq!(merged["payment"]["pixKey"], "loja@exemplo.com");
    assert!(merged["payment"].get("bankDetails").is_some());
    // Collection wholesale: the cached product list replaces the template's
    assert_eq!(merged["products"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_unparseable_and_mistyped_caches_fall_back_to_template() {
    let template = StoreConfig::template();

    assert_eq!(load_or_default(None, &template), template);
    assert_eq!(load_or_default(Some("{oops"), &template), template);
    assert_eq!(load_or_default(Some("42"), &template), template);

    let mistyped = json!({"schemaVersion": 2, "categories": {"not": "a list"}}).to_string();
    assert_eq!(load_or_default(Some(&mistyped), &template), template);
}

// =============================================================================
// Versioned Migration
// =============================================================================

#[test]
fn test_v1_document_migrates_losslessly() {
    let v1 = json!({
        "settings": {
            "docId": "bin-42",
            "writeSecret": "chave",
            "status": "open",
            "contactNumber": "5511988887777"
        },
        "appearance": {"headerFooterColor": "#0EA5E9"},
        "products": [{"id": "prod-1", "name": "Suco", "price": 6.0, "stock": 3}]
    });

    let migrated = migrate::migrate_to_current(v1);
    assert_eq!(migrated["schemaVersion"], SCHEMA_VERSION);

    let template = StoreConfig::template();
    let config = load_or_default(Some(&migrated.to_string()), &template);

    assert_eq!(config.schema_version, SCHEMA_VERSION);
    assert_eq!(config.publication.remote_doc_id, "bin-42");
    assert_eq!(config.publication.write_secret, "chave");
    assert_eq!(config.operations.status, StoreStatus::Open);
    assert_eq!(config.operations.contact_number, "5511988887777");
    assert_eq!(config.appearance.primary_color, "#0EA5E9");
    assert_eq!(config.products.len(), 1);
    assert_eq!(config.products[0].name, "Suco");
}

#[test]
fn test_load_or_default_migrates_v1_in_one_step() {
    // Same as above but without the explicit migrate call: load handles it
    let v1 = json!({
        "settings": {"docId": "bin-42", "writeSecret": "chave"},
        "appearance": {"colorPrimary": "#10B981"}
    })
    .to_string();

    let config = load_or_default(Some(&v1), &StoreConfig::template());

    assert_eq!(config.publication.remote_doc_id, "bin-42");
    assert_eq!(config.appearance.primary_color, "#10B981");
}

// =============================================================================
// Snapshot Round-Trip
// =============================================================================

#[test]
fn test_import_of_export_is_structural_identity() {
    let mut config = StoreConfig::template();
    config.operations.store_name = "Cantina da Ana".to_string();
    config
        .extra
        .insert("customSection".to_string(), Value::from(7));

    let text = config.export_snapshot().expect("serializes");
    let back = StoreConfig::import_snapshot(&text).expect("imports");

    assert_eq!(back, config);
}
