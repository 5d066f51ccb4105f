//! One-time startup: install metrics, open datasets, then build the hash
//! registry.
//!
//! Any step failing aborts startup. Nothing is served from a partially
//! built state.

use std::path::PathBuf;

use axum::Router;
use hashed_urls_config::PluginConfig;
use hashed_urls_core::{HashRegistry, RegistryError};
use hashed_urls_db::{Catalog, DatasetError};
use metrics_exporter_prometheus::BuildError;
use tracing::{error, info, instrument};

use crate::metrics::{init_metrics, set_registered_databases};
use crate::router::init_router_with_metrics;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] BuildError),
}

/// Open `files` as mutable and `immutables` as immutable datasets and build
/// the registry over all of them.
#[instrument(skip(plugin_config))]
pub async fn init_app_state(
    files: &[PathBuf],
    immutables: &[PathBuf],
    plugin_config: PluginConfig,
) -> Result<AppState, StartupError> {
    let catalog = Catalog::open(files, immutables).await?;

    let registry = HashRegistry::build(&catalog.datasets()).inspect_err(|e| {
        if let RegistryError::UnderscoreInName { name } = e {
            error!(database = %name, "Database name contains the hash separator");
        }
    })?;

    for (name, hash) in registry.entries() {
        info!(database = %name, %hash, "Serving immutable database under hashed URL");
    }

    Ok(AppState::new(catalog, registry, plugin_config))
}

/// Build the served application.
///
/// The recorder is installed before anything is measured; gauges set
/// earlier go to the no-op recorder and are lost. Installs a process-wide
/// recorder, so call at most once per process.
pub async fn init_app(
    files: &[PathBuf],
    immutables: &[PathBuf],
    plugin_config: PluginConfig,
) -> Result<Router, StartupError> {
    let metrics = init_metrics()?;

    let state = init_app_state(files, immutables, plugin_config).await?;
    set_registered_databases(state.registry.len(), state.catalog.len());

    Ok(init_router_with_metrics(state, metrics))
}
