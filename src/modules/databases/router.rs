use axum::{Router, routing::get};
use hashed_urls_cache::{CacheControlConfig, cache_control};

use crate::state::AppState;

use super::controller::{
    databases_json, get_database, get_row, get_table, hashed_urls_json, index,
};

/// Introspection endpoints. These describe the current deployment, so they
/// are never cached.
pub fn init_introspection_router() -> Router<AppState> {
    Router::new()
        .route("/-/databases.json", get(databases_json))
        .route("/-/hashed-urls.json", get(hashed_urls_json))
        .route_layer(cache_control(CacheControlConfig::no_cache()))
}

pub fn init_databases_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{database}", get(get_database))
        .route("/{database}/{table}", get(get_table))
        .route("/{database}/{table}/{pk}", get(get_row))
}
