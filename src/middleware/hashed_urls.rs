//! Redirects unhashed immutable database paths and marks hashed ones as
//! cacheable.
//!
//! | Request                 | Result                                              |
//! |-------------------------|-----------------------------------------------------|
//! | `/<name>/...?q`         | `302` to `/<name>_<hash>/...?q`, `max-age=5`        |
//! | `/<name>_<hash>/...?q`  | served as `/<name>/...?q`, `max-age=<N>, public`    |
//! | anything else           | untouched                                           |
//!
//! The middleware rewrites the URI, so it has to run before routing: wrap
//! the whole router with it rather than using `route_layer`.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue, StatusCode, Uri,
        header::{CACHE_CONTROL, LOCATION},
        uri::PathAndQuery,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use hashed_urls_cache::CacheControlConfig;
use hashed_urls_config::PluginConfig;
use hashed_urls_core::{Rewrite, classify};
use tracing::{debug, warn};

use crate::metrics::{track_hashed_hit, track_redirect};
use crate::state::AppState;

/// Header values rendered once from the plugin configuration.
#[derive(Clone, Debug)]
pub struct CacheHeaders {
    pub hashed: HeaderValue,
    /// `None` when redirects should carry no Cache-Control at all.
    pub redirect: Option<HeaderValue>,
}

impl CacheHeaders {
    pub fn from_config(config: &PluginConfig) -> Self {
        let redirect = (config.redirect_max_age > 0)
            .then(|| CacheControlConfig::max_age(config.redirect_max_age).to_header_value());

        Self {
            hashed: CacheControlConfig::public(config.max_age).to_header_value(),
            redirect,
        }
    }
}

/// Request extension naming the dataset when it was addressed by hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashedDataset(pub String);

pub async fn hashed_urls_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/");

    match classify(path_and_query, &state.registry) {
        Rewrite::Passthrough => next.run(req).await,

        Rewrite::Redirect { dataset, location } => {
            // `location` is the request's own path and query with the hash
            // spliced into the first segment, so it is always a valid header.
            let Ok(location_value) = HeaderValue::from_str(&location) else {
                warn!(%location, "Redirect target is not a valid header value");
                return next.run(req).await;
            };
            debug!(database = %dataset, %location, "Redirecting to hashed URL");
            track_redirect(&dataset);

            let mut response = (StatusCode::FOUND, [(LOCATION, location_value)]).into_response();
            if let Some(value) = &state.cache_headers.redirect {
                response.headers_mut().insert(CACHE_CONTROL, value.clone());
            }
            response
        }

        Rewrite::Hashed { dataset, path } => {
            match with_path_and_query(req.uri(), &path) {
                Some(uri) => *req.uri_mut() = uri,
                None => {
                    warn!(%path, "Could not rebuild URI for hashed request");
                    return next.run(req).await;
                }
            }
            debug!(database = %dataset, %path, "Serving hashed URL");
            track_hashed_hit(&dataset);
            req.extensions_mut().insert(HashedDataset(dataset));

            let mut response = next.run(req).await;
            response
                .headers_mut()
                .insert(CACHE_CONTROL, state.cache_headers.hashed.clone());
            response
        }
    }
}

fn with_path_and_query(uri: &Uri, path_and_query: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_headers_default() {
        let headers = CacheHeaders::from_config(&PluginConfig::default());
        assert_eq!(headers.hashed, "max-age=31536000, public");
        assert_eq!(headers.redirect.unwrap(), "max-age=5");
    }

    #[test]
    fn test_cache_headers_without_redirect_ttl() {
        let headers = CacheHeaders::from_config(&PluginConfig {
            max_age: 3600,
            redirect_max_age: 0,
        });
        assert_eq!(headers.hashed, "max-age=3600, public");
        assert!(headers.redirect.is_none());
    }

    #[test]
    fn test_with_path_and_query_keeps_authority() {
        let uri: Uri = "http://example.com/immutable_abc/t?id=1".parse().unwrap();
        let rewritten = with_path_and_query(&uri, "/immutable/t?id=1").unwrap();
        assert_eq!(rewritten.to_string(), "http://example.com/immutable/t?id=1");
    }

    #[test]
    fn test_with_path_and_query_relative() {
        let uri: Uri = "/immutable_abc".parse().unwrap();
        let rewritten = with_path_and_query(&uri, "/immutable").unwrap();
        assert_eq!(rewritten.path(), "/immutable");
        assert_eq!(rewritten.query(), None);
    }

    #[test]
    fn test_redirect_location_is_always_a_header_value() {
        use hashed_urls_core::{ContentDigest, Dataset, HashRegistry};

        let registry = HashRegistry::build(&[Dataset::immutable(
            "immutable",
            ContentDigest::of_bytes(b"contents"),
        )])
        .unwrap();

        for raw in [
            "/immutable",
            "/immutable/t?id=1&_size=2",
            "/immutable/%E2%9C%93/t?q=%22a%20b%22",
            "/immutable/t?",
        ] {
            let uri: Uri = raw.parse().unwrap();
            let path_and_query = uri.path_and_query().unwrap().as_str();
            match classify(path_and_query, &registry) {
                Rewrite::Redirect { location, .. } => {
                    assert!(HeaderValue::from_str(&location).is_ok(), "{}", location);
                }
                other => panic!("expected redirect for {}, got {:?}", raw, other),
            }
        }
    }
}
