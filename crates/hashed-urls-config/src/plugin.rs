//! Plugin configuration.
//!
//! Settings come from the `plugins` section of a metadata JSON document,
//! keyed by [`PLUGIN_NAME`]:
//!
//! ```json
//! {"plugins": {"datasette-hashed-urls": {"max_age": 3600}}}
//! ```
//!
//! # Environment Variables
//!
//! - `HASHED_URLS_MAX_AGE`: overrides `max_age`
//! - `HASHED_URLS_REDIRECT_MAX_AGE`: overrides `redirect_max_age`

use std::collections::HashMap;
use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Key of this plugin's section under `plugins` in the metadata document.
pub const PLUGIN_NAME: &str = "datasette-hashed-urls";

/// One year.
pub const DEFAULT_MAX_AGE: u64 = 31_536_000;

pub const DEFAULT_REDIRECT_MAX_AGE: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read metadata file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Host metadata document. Only the `plugins` section is interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub plugins: HashMap<String, serde_json::Value>,
}

impl Metadata {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    max_age: Option<u64>,
    redirect_max_age: Option<u64>,
}

/// Cache lifetimes used by the rewriter. Fixed for the process lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginConfig {
    /// `max-age` for responses served under a hashed path.
    pub max_age: u64,
    /// `max-age` for redirect responses. Zero omits the header.
    pub redirect_max_age: u64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            redirect_max_age: DEFAULT_REDIRECT_MAX_AGE,
        }
    }
}

impl PluginConfig {
    pub fn from_metadata(metadata: &Metadata) -> Result<Self, ConfigError> {
        let section = match metadata.plugins.get(PLUGIN_NAME) {
            Some(value) => PluginSection::deserialize(value)?,
            None => PluginSection::default(),
        };

        Ok(Self {
            max_age: section.max_age.unwrap_or(DEFAULT_MAX_AGE),
            redirect_max_age: section.redirect_max_age.unwrap_or(DEFAULT_REDIRECT_MAX_AGE),
        })
    }

    /// Apply command-line values. These win over everything else.
    pub fn with_cli_overrides(mut self, max_age: Option<u64>, redirect_max_age: Option<u64>) -> Self {
        if let Some(max_age) = max_age {
            self.max_age = max_age;
        }
        if let Some(redirect_max_age) = redirect_max_age {
            self.redirect_max_age = redirect_max_age;
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_seconds(&lookup, "HASHED_URLS_MAX_AGE") {
            self.max_age = value;
        }
        if let Some(value) = parse_seconds(&lookup, "HASHED_URLS_REDIRECT_MAX_AGE") {
            self.redirect_max_age = value;
        }
        self
    }
}

fn parse_seconds<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring non-integer cache lifetime");
            None
        }
    }
}
