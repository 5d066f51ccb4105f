//! # hashed-urls
//!
//! Serves SQLite databases over HTTP and gives every immutable database a
//! URL that embeds a hash of its content. Because the URL changes whenever
//! the content does, responses under it can be cached for a year.
//!
//! ## Overview
//!
//! At startup every database file is opened and every immutable one is
//! hashed (SHA-256, first 8 hex characters). The result is a read-only
//! [`HashRegistry`](hashed_urls_core::HashRegistry) shared by all requests.
//!
//! Per request, the leading path segment decides what happens:
//!
//! ```text
//! GET /fixtures/t?id=1            -> 302 Location: /fixtures_1a2b3c4d/t?id=1
//!                                    cache-control: max-age=5
//! GET /fixtures_1a2b3c4d/t?id=1   -> 200, served as /fixtures/t?id=1
//!                                    cache-control: max-age=31536000, public
//! GET /scratch/t                  -> 200, untouched (mutable database)
//! ```
//!
//! Database names must not contain `_`, because the hash is appended after
//! an underscore. Startup fails if any does.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── hashed-urls-core/    # Registry, path classification, errors
//! ├── hashed-urls-config/  # Plugin config (max_age) and server config
//! ├── hashed-urls-db/      # SQLite loading, content digests, read queries
//! └── hashed-urls-cache/   # Cache-Control policies
//! src/
//! ├── middleware/          # The hashed URL rewriter
//! ├── modules/databases/   # Host endpoints (listing, tables, rows)
//! ├── startup.rs           # Catalog + registry construction
//! ├── router.rs            # Layer ordering
//! ├── logging.rs           # Tracing setup and request logging
//! └── metrics.rs           # Prometheus metrics
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {"plugins": {"datasette-hashed-urls": {"max_age": 3600}}}
//! ```
//!
//! ```bash
//! HASHED_URLS_MAX_AGE=3600
//! HASHED_URLS_REDIRECT_MAX_AGE=5
//! HOST=127.0.0.1
//! PORT=8001
//! LOG_LEVEL=info
//! LOG_DIR=storage/logs
//! OBSERVABILITY_ENABLED=true
//! ```
//!
//! ## Running
//!
//! ```bash
//! hashed-urls serve scratch.db --immutable fixtures.db --metadata metadata.json
//! hashed-urls inspect --immutable fixtures.db
//! ```

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod startup;
pub mod state;

// Re-export workspace crates for convenience
pub use hashed_urls_cache;
pub use hashed_urls_config;
pub use hashed_urls_core;
pub use hashed_urls_db;
