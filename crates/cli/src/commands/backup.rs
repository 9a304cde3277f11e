//! Snapshot backups: export to and import from JSON files.

use std::path::{Path, PathBuf};

use chrono::Utc;

use vitrine_admin::services::ConfigStore;

use super::open_config_store;

/// Export the store document to a JSON file.
pub fn export(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let (_, config_store) = open_config_store()?;

    let document = config_store.load();
    let text = document.export_snapshot()?;

    let path = output.unwrap_or_else(|| PathBuf::from(ConfigStore::export_file_name(Utc::now())));
    std::fs::write(&path, text)?;

    tracing::info!(path = %path.display(), "store document exported");
    Ok(())
}

/// Replace the store document with a backup file.
///
/// Requires `--yes`: import is a wholesale replacement, never a merge.
pub fn import(file: &Path, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("import replaces the whole store document; pass --yes to confirm".into());
    }

    let (_, config_store) = open_config_store()?;

    let text = std::fs::read_to_string(file)?;
    let imported = ConfigStore::import(&text)?;
    config_store.persist(&imported)?;

    tracing::info!(path = %file.display(), "store document imported");
    Ok(())
}
