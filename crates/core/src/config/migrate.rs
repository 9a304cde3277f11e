//! Versioned schema migration for persisted store documents.
//!
//! Persisted documents carry a `schemaVersion` integer; documents written
//! before versioning exist are version 1. Each bump gets one explicit
//! migration step, applied in order on the raw JSON before the document is
//! reconciled against the template. Working on raw JSON keeps fields the
//! current binary does not know about intact.
//!
//! # History
//!
//! - v1: flat `settings` group mixing publication credentials with
//!   operational fields; drifted appearance color names (`colorPrimary`,
//!   `headerFooterColor`).
//! - v2: `publication` and `operations` split apart; canonical
//!   `primaryColor`.

use serde_json::{Map, Value};

use super::SCHEMA_VERSION;

/// Appearance color aliases folded into `primaryColor` by the v1 -> v2 step.
const PRIMARY_COLOR_ALIASES: [&str; 2] = ["colorPrimary", "headerFooterColor"];

/// Settings keys that moved to the `publication` group in v2.
const PUBLICATION_KEYS: [(&str, &str); 2] =
    [("docId", "remoteDocId"), ("writeSecret", "writeSecret")];

/// Upgrade a raw document to the current schema version.
///
/// Non-object documents are returned unchanged; the caller treats them as
/// unusable and falls back to the template.
#[must_use]
pub fn migrate_to_current(doc: Value) -> Value {
    let Value::Object(mut root) = doc else {
        return doc;
    };

    let mut version = detect_version(&root);
    while version < SCHEMA_VERSION {
        match version {
            1 => migrate_v1_to_v2(&mut root),
            _ => break,
        }
        version += 1;
    }
    root.insert("schemaVersion".to_string(), Value::from(SCHEMA_VERSION));

    Value::Object(root)
}

/// Read the document's schema version; absent or unreadable means v1.
#[must_use]
pub fn detect_version(root: &Map<String, Value>) -> u32 {
    root.get("schemaVersion")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
}

/// v1 -> v2: split the flat `settings` group and normalize color names.
fn migrate_v1_to_v2(root: &mut Map<String, Value>) {
    if let Some(Value::Object(settings)) = root.remove("settings") {
        let mut publication = take_object(root, "publication");
        let mut operations = take_object(root, "operations");

        for (key, value) in settings {
            if let Some((_, renamed)) = PUBLICATION_KEYS.iter().find(|(old, _)| *old == key) {
                publication.entry((*renamed).to_string()).or_insert(value);
            } else {
                operations.entry(key).or_insert(value);
            }
        }

        root.insert("publication".to_string(), Value::Object(publication));
        root.insert("operations".to_string(), Value::Object(operations));
    }

    if let Some(Value::Object(appearance)) = root.get_mut("appearance") {
        for alias in PRIMARY_COLOR_ALIASES {
            if let Some(value) = appearance.remove(alias) {
                appearance.entry("primaryColor".to_string()).or_insert(value);
            }
        }
    }
}

/// Remove `key` from `root`, returning its object value or an empty map.
fn take_object(root: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match root.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v1_settings_group_is_split() {
        let v1 = json!({
            "settings": {
                "docId": "abc123",
                "writeSecret": "s3cret",
                "status": "open",
                "contactNumber": "5511999998888",
                "lowStockThreshold": 3
            }
        });

        let v2 = migrate_to_current(v1);

        assert_eq!(v2["schemaVersion"], 2);
        assert_eq!(v2["publication"]["remoteDocId"], "abc123");
        assert_eq!(v2["publication"]["writeSecret"], "s3cret");
        assert_eq!(v2["operations"]["status"], "open");
        assert_eq!(v2["operations"]["contactNumber"], "5511999998888");
        assert_eq!(v2["operations"]["lowStockThreshold"], 3);
        assert!(v2.get("settings").is_none());
    }

    #[test]
    fn test_color_aliases_fold_into_primary_color() {
        let v1 = json!({
            "appearance": {"colorPrimary": "#10B981", "backgroundColor": "#fff"}
        });

        let v2 = migrate_to_current(v1);

        assert_eq!(v2["appearance"]["primaryColor"], "#10B981");
        assert!(v2["appearance"].get("colorPrimary").is_none());
        assert_eq!(v2["appearance"]["backgroundColor"], "#fff");
    }

    #[test]
    fn test_canonical_name_wins_over_aliases() {
        let v1 = json!({
            "appearance": {
                "primaryColor": "#111111",
                "headerFooterColor": "#222222"
            }
        });

        let v2 = migrate_to_current(v1);

        assert_eq!(v2["appearance"]["primaryColor"], "#111111");
        assert!(v2["appearance"].get("headerFooterColor").is_none());
    }

    #[test]
    fn test_current_documents_pass_through() {
        let doc = json!({
            "schemaVersion": 2,
            "operations": {"status": "closed"},
            "products": []
        });

        let migrated = migrate_to_current(doc.clone());

        assert_eq!(migrated, doc);
    }

    #[test]
    fn test_migration_preserves_unknown_fields() {
        let v1 = json!({
            "settings": {"docId": "abc", "futureKnob": 7},
            "loyaltyProgram": {"enabled": true}
        });

        let v2 = migrate_to_current(v1);

        assert_eq!(v2["operations"]["futureKnob"], 7);
        assert_eq!(v2["loyaltyProgram"]["enabled"], true);
    }

    #[test]
    fn test_non_object_documents_are_untouched() {
        assert_eq!(migrate_to_current(json!([1, 2])), json!([1, 2]));
    }
}
