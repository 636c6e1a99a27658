use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{StoreError, StoreResult};

pub const DEFAULT_CONFIG_FILE: &str = "storefront.toml";
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";
pub const ENV_PREFIX: &str = "STOREFRONT_";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "https://fakestoreapi.com/products".to_string()
}

fn default_catalog_timeout() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorefrontConfig {
    pub host: String,
    pub port: u16,
    /// Root of the hour-bucket tree. Relative paths resolve against the
    /// working directory at startup.
    pub log_dir: String,
    pub static_dir: String,
    pub log_level: String,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            host: "0.0.0.0".into(),
            port: 3000,
            log_dir: "logs".into(),
            static_dir: "public".into(),
            log_level: "info".into(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tracing_level(&self) -> StoreResult<tracing::Level> {
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| StoreError::config(format!("unknown log_level '{}'", self.log_level)))
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.port == 0 {
            return Err(StoreError::config("port must be non-zero"));
        }
        if self.log_dir.trim().is_empty() {
            return Err(StoreError::config("log_dir cannot be empty"));
        }
        if self.catalog.base_url.trim().is_empty() {
            return Err(StoreError::config("catalog.base_url cannot be empty"));
        }
        self.tracing_level()?;
        Ok(())
    }
}

/// Defaults, then the TOML file, then `STOREFRONT_*` variables
/// (`STOREFRONT_CATALOG__BASE_URL` sets `catalog.base_url`).
pub fn figment(config_path: Option<&str>) -> Figment {
    let path = config_path
        .map(str::to_string)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    Figment::from(Serialized::defaults(StorefrontConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn load_config(config_path: Option<&str>) -> StoreResult<StorefrontConfig> {
    let config: StorefrontConfig = figment(config_path).extract()?;
    config.validate()?;
    Ok(config)
}
