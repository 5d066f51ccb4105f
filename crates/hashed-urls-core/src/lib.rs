//! # Hashed URLs Core
//!
//! Core types for serving immutable datasets under content-hashed URLs.
//!
//! - [`dataset`]: Dataset descriptors and content digests
//! - [`registry`]: The startup-built, read-only name to hash mapping
//! - [`rewrite`]: Per-request classification of paths against the registry
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use hashed_urls_core::{ContentDigest, Dataset, HashRegistry, Rewrite, classify};
//!
//! let datasets = vec![
//!     Dataset::mutable("mutable"),
//!     Dataset::immutable("immutable", ContentDigest::of_bytes(b"...")),
//! ];
//! let registry = HashRegistry::build(&datasets)?;
//!
//! match classify("/immutable/t?id=1", &registry) {
//!     Rewrite::Redirect { location, .. } => { /* 302 to location */ }
//!     Rewrite::Hashed { path, .. } => { /* forward path, add cache header */ }
//!     Rewrite::Passthrough => {}
//! }
//! ```

pub mod dataset;
pub mod errors;
pub mod registry;
pub mod rewrite;

// Re-export commonly used types at crate root
pub use dataset::{ContentDigest, Dataset, Mutability};
pub use errors::AppError;
pub use registry::{HASH_TOKEN_LEN, HashRegistry, HashToken, RegistryError};
pub use rewrite::{Rewrite, classify};
