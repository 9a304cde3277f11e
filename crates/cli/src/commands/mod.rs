//! CLI command implementations.

pub mod backup;
pub mod seed;
pub mod sync;

use vitrine_admin::config::AdminConfig;
use vitrine_admin::db::LocalStore;
use vitrine_admin::services::ConfigStore;

/// Open the admin's config store using the environment configuration.
pub(crate) fn open_config_store() -> Result<(AdminConfig, ConfigStore), Box<dyn std::error::Error>>
{
    let config = AdminConfig::from_env()?;
    let store = LocalStore::open(&config.store_path())?;
    Ok((config, ConfigStore::new(store)))
}
