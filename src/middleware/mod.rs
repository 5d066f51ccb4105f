//! Middleware for request processing.
//!
//! - [`hashed_urls`]: Redirects unhashed immutable database paths to their
//!   hashed form and adds far-future caching to hashed responses
//!
//! # Ordering
//!
//! `hashed_urls` rewrites the request URI, so it wraps the router from the
//! outside (see [`crate::router::init_router`]). Request logging wraps it in
//! turn so redirects are logged with the path the client asked for.

pub mod hashed_urls;
