use std::sync::Arc;

use hashed_urls_config::PluginConfig;
use hashed_urls_core::HashRegistry;
use hashed_urls_db::Catalog;

use crate::middleware::hashed_urls::CacheHeaders;

/// Shared, read-only state built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub registry: Arc<HashRegistry>,
    pub plugin_config: PluginConfig,
    pub cache_headers: CacheHeaders,
}

impl AppState {
    pub fn new(catalog: Catalog, registry: HashRegistry, plugin_config: PluginConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            registry: Arc::new(registry),
            cache_headers: CacheHeaders::from_config(&plugin_config),
            plugin_config,
        }
    }
}
