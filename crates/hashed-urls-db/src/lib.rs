//! # Hashed URLs DB
//!
//! Loads SQLite files as datasets and answers the read-only lookups the
//! host endpoints need.
//!
//! - [`catalog`]: Opens every file, derives logical names and content digests
//! - [`queries`]: Table listing, row listing and primary key lookups
//!
//! Immutable files are opened with SQLite's `immutable=1` flag and hashed by
//! streaming their bytes through SHA-256. Mutable files are opened read-only
//! and never hashed.
//!
//! # Example
//!
//! ```ignore
//! use hashed_urls_db::Catalog;
//!
//! let catalog = Catalog::open(&["mutable.db".into()], &["immutable.db".into()]).await?;
//! let registry = hashed_urls_core::HashRegistry::build(&catalog.datasets())?;
//! ```

pub mod catalog;
pub mod queries;

pub use catalog::{Catalog, Database, DatasetError, digest_file};
pub use queries::{ColumnInfo, TableRows};
