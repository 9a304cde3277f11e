//! Seed the local store with the default template.

use vitrine_core::config::StoreConfig;

use super::open_config_store;

/// Write the default template into the local store.
///
/// Refuses to overwrite an existing document unless `force` is set.
pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, config_store) = open_config_store()?;

    if !force && config_store.local().load_raw()?.is_some() {
        return Err("a store document already exists; pass --force to overwrite".into());
    }

    config_store.persist(&StoreConfig::template())?;
    tracing::info!(
        path = %config_store.local().path().display(),
        "local store seeded with the default template"
    );
    Ok(())
}
