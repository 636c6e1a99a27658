use std::path::{Path, PathBuf};

use crate::{
    catalog::CatalogClient,
    config_loader::StorefrontConfig,
    errors::StoreResult,
    event_log::EventLog,
    log_path::absolute_root,
};

/// Shared handles for request handlers. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub event_log: EventLog,
    pub catalog: CatalogClient,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(event_log: EventLog, catalog: CatalogClient, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            event_log,
            catalog,
            static_dir: static_dir.into(),
        }
    }

    pub fn from_config(config: &StorefrontConfig) -> StoreResult<Self> {
        let root = absolute_root(Path::new(&config.log_dir))?;
        let catalog = CatalogClient::new(config.catalog.base_url.clone(), config.catalog.timeout())?;
        Ok(Self::new(EventLog::new(root), catalog, &config.static_dir))
    }
}
