//! # Hashed URLs Config
//!
//! Configuration types for the hashed-urls server.
//!
//! - [`plugin`]: Cache lifetimes, read from a metadata file and the environment
//! - [`server`]: Listener address
//!
//! # Example
//!
//! ```ignore
//! use hashed_urls_config::{Metadata, PluginConfig, ServerConfig};
//!
//! let metadata = Metadata::from_path("metadata.json")?;
//! let plugin = PluginConfig::from_metadata(&metadata)?.with_env_overrides();
//! let server = ServerConfig::from_env();
//! ```

pub mod plugin;
pub mod server;

// Re-export commonly used types at crate root
pub use plugin::{
    ConfigError, DEFAULT_MAX_AGE, DEFAULT_REDIRECT_MAX_AGE, Metadata, PLUGIN_NAME, PluginConfig,
};
pub use server::ServerConfig;
