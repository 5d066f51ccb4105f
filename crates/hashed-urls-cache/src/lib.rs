//! # Hashed URLs Cache
//!
//! HTTP caching policy for the hashed-urls server.
//!
//! This crate provides:
//! - [`CacheControlConfig`]: a typed `Cache-Control` policy rendered to a header value
//! - [`cache_control`]: a tower layer applying a fixed policy to every response
//!
//! # Example
//!
//! ```ignore
//! use hashed_urls_cache::{CacheControlConfig, cache_control};
//!
//! // Long-lived header for content-addressed responses
//! let hashed = CacheControlConfig::public(31_536_000).to_header_value();
//! assert_eq!(hashed, "max-age=31536000, public");
//!
//! // Layer for introspection endpoints
//! let router = router.route_layer(cache_control(CacheControlConfig::no_cache()));
//! ```

pub mod control;

pub use control::{CacheControlConfig, CacheControlMakeHeader, cache_control};
