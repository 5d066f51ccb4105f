use axum::{Router, middleware};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::middleware::hashed_urls::hashed_urls_middleware;
use crate::modules::databases::{init_databases_router, init_introspection_router};
use crate::state::AppState;

/// Build the application without a metrics endpoint.
pub fn init_router(state: AppState) -> Router {
    init_router_with_metrics(state, None)
}

/// Build the application.
///
/// The host routes live in an inner router used as the fallback service of
/// an outer one. Layers on the outer router run before the inner router
/// matches, which lets `hashed_urls_middleware` rewrite hashed paths back to
/// plain database names.
pub fn init_router_with_metrics(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut routes = Router::new()
        .merge(init_introspection_router())
        .merge(init_databases_router())
        .with_state(state.clone())
        .layer(middleware::from_fn(metrics_middleware));

    if let Some(handle) = metrics {
        routes = routes.merge(metrics_app(handle));
    }

    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(state, hashed_urls_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
