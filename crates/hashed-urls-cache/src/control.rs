//! `Cache-Control` header policies.
//!
//! Hashed responses are rendered as `max-age=<N>, public`; redirects carry a
//! bare `max-age=<N>` so that browsers re-check the redirect target soon
//! after a redeploy.

use axum::http::{HeaderValue, Response, header::CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

/// Configuration for a Cache-Control header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheControlConfig {
    /// Maximum age in seconds the response is considered fresh.
    pub max_age: u64,
    /// Whether shared caches (CDNs, proxies) may store the response.
    pub public: bool,
    /// Whether the cache must revalidate before reuse.
    pub no_cache: bool,
    /// Whether the response must not be stored at all.
    pub no_store: bool,
}

impl CacheControlConfig {
    /// Cacheable by any cache for `max_age` seconds.
    pub fn public(max_age: u64) -> Self {
        Self {
            max_age,
            public: true,
            no_cache: false,
            no_store: false,
        }
    }

    /// Only a max-age directive, no visibility qualifier.
    pub fn max_age(max_age: u64) -> Self {
        Self {
            max_age,
            public: false,
            no_cache: false,
            no_store: false,
        }
    }

    /// Always revalidate.
    pub fn no_cache() -> Self {
        Self {
            max_age: 0,
            public: false,
            no_cache: true,
            no_store: false,
        }
    }

    /// Never store.
    pub fn no_store() -> Self {
        Self {
            max_age: 0,
            public: false,
            no_cache: true,
            no_store: true,
        }
    }

    /// Render the directives in a fixed order.
    pub fn to_header_string(&self) -> String {
        let mut directives = Vec::new();

        if self.no_store {
            directives.push("no-store".to_string());
        }
        if self.no_cache {
            directives.push("no-cache".to_string());
        }

        if !self.no_store && !self.no_cache {
            directives.push(format!("max-age={}", self.max_age));
            if self.public {
                directives.push("public".to_string());
            }
        }

        directives.join(", ")
    }

    /// Build the Cache-Control header value.
    pub fn to_header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.to_header_string())
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self::no_cache()
    }
}

/// Produces a fixed Cache-Control value for every response.
#[derive(Clone)]
pub struct CacheControlMakeHeader(HeaderValue);

impl<B> tower_http::set_header::MakeHeaderValue<Response<B>> for CacheControlMakeHeader {
    fn make_header_value(&mut self, _message: &Response<B>) -> Option<HeaderValue> {
        Some(self.0.clone())
    }
}

/// Create a Cache-Control layer with the given configuration.
///
/// Handlers that already set the header keep their value.
pub fn cache_control(config: CacheControlConfig) -> SetResponseHeaderLayer<CacheControlMakeHeader> {
    let header_value = config.to_header_value();
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, CacheControlMakeHeader(header_value))
}
