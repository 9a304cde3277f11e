//! Reconciliation of a cached document against the built-in template.
//!
//! Loading works on raw JSON so that no key present on either side is ever
//! dropped: the template contributes fields a stale cache predates, the
//! cache contributes fields the template has never heard of.

use serde_json::Value;

use super::{StoreConfig, migrate};

/// Nested groups merged field-by-field instead of wholesale.
const GROUP_KEYS: [&str; 4] = ["publication", "operations", "appearance", "payment"];

/// Build the working document from an optional cached snapshot.
///
/// - No cache, unparseable cache, or a cache that is not a JSON object:
///   a deep copy of `template`. This function never fails.
/// - Otherwise the cached document is migrated to the current schema
///   version, then merged over the template: top-level keys shallowly,
///   the known groups field-by-field (cached values win, template fills
///   gaps), and the `categories`/`products`/`coverageAreas` collections
///   wholesale from the cache when present.
#[must_use]
pub fn load_or_default(cached: Option<&str>, template: &StoreConfig) -> StoreConfig {
    let Some(text) = cached else {
        return template.clone();
    };
    let Ok(raw) = serde_json::from_str::<Value>(text) else {
        return template.clone();
    };
    if !raw.is_object() {
        return template.clone();
    }

    let migrated = migrate::migrate_to_current(raw);
    let Ok(template_value) = serde_json::to_value(template) else {
        return template.clone();
    };

    let merged = reconcile(migrated, template_value);
    serde_json::from_value(merged).unwrap_or_else(|_| template.clone())
}

/// Merge a migrated cached document over the template document.
///
/// Both arguments must be JSON objects; anything else returns the cached
/// value unchanged.
#[must_use]
pub fn reconcile(cached: Value, template: Value) -> Value {
    let Value::Object(cached) = cached else {
        return cached;
    };
    let Value::Object(mut merged) = template else {
        return Value::Object(cached);
    };

    for (key, value) in cached {
        let group_merge = GROUP_KEYS.contains(&key.as_str())
            && value.is_object()
            && merged.get(&key).is_some_and(Value::is_object);

        if group_merge {
            if let (Some(Value::Object(base)), Value::Object(overlay)) =
                (merged.get_mut(&key), value)
            {
                for (field, field_value) in overlay {
                    base.insert(field, field_value);
                }
            }
        } else {
            merged.insert(key, value);
        }
    }

    Value::Object(merged)
}
