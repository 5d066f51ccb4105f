//! Startup-built mapping from dataset name to content hash token.
//!
//! The registry is built exactly once before the server accepts requests.
//! [`HashRegistry::build`] either returns a complete registry or an error;
//! callers abort startup on error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::{ContentDigest, Dataset};

/// Number of hex characters of the content digest used in URLs.
pub const HASH_TOKEN_LEN: usize = 8;

/// Separator placed between a dataset name and its hash token.
pub const HASH_SEPARATOR: char = '_';

/// Short content-derived token appended to an immutable dataset's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HashToken(String);

impl HashToken {
    pub fn from_digest(digest: &ContentDigest) -> Self {
        Self(digest.as_str()[..HASH_TOKEN_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons the registry refuses to build. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("datasette-hashed-urls does not work with databases with \"_\" in their name")]
    UnderscoreInName { name: String },

    #[error("dataset names must not be empty")]
    EmptyName,

    #[error("dataset \"{name}\" is registered more than once")]
    DuplicateName { name: String },

    #[error("immutable dataset \"{name}\" has no content digest")]
    MissingDigest { name: String },
}

/// Read-only name to hash token mapping for immutable datasets.
#[derive(Debug, Clone, Default)]
pub struct HashRegistry {
    hashes: BTreeMap<String, HashToken>,
}

impl HashRegistry {
    /// Validate every dataset and hash the immutable ones.
    ///
    /// Names are checked for mutable datasets too: a mutable `foo_bar` would
    /// be indistinguishable from a hashed `foo`.
    pub fn build(datasets: &[Dataset]) -> Result<Self, RegistryError> {
        let mut seen = BTreeSet::new();
        for dataset in datasets {
            if dataset.name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if dataset.name.contains(HASH_SEPARATOR) {
                return Err(RegistryError::UnderscoreInName {
                    name: dataset.name.clone(),
                });
            }
            if !seen.insert(dataset.name.as_str()) {
                return Err(RegistryError::DuplicateName {
                    name: dataset.name.clone(),
                });
            }
        }

        let mut hashes = BTreeMap::new();
        for dataset in datasets.iter().filter(|d| !d.is_mutable()) {
            let digest = dataset
                .digest
                .as_ref()
                .ok_or_else(|| RegistryError::MissingDigest {
                    name: dataset.name.clone(),
                })?;
            let token = HashToken::from_digest(digest);
            debug!(dataset = %dataset.name, hash = %token, "Registered immutable dataset");
            hashes.insert(dataset.name.clone(), token);
        }

        info!(
            datasets = datasets.len(),
            immutable = hashes.len(),
            "Hash registry built"
        );

        Ok(Self { hashes })
    }

    /// Hash token for an immutable dataset, `None` for anything else.
    pub fn hash_for(&self, name: &str) -> Option<&HashToken> {
        self.hashes.get(name)
    }

    /// Name under which a dataset is published: `<name>_<hash>` when
    /// immutable, the name itself otherwise.
    pub fn public_name(&self, name: &str) -> String {
        match self.hash_for(name) {
            Some(token) => hashed_segment(name, token),
            None => name.to_string(),
        }
    }

    /// Resolve a `<name>_<hash>` segment to the dataset name if the hash is
    /// current.
    pub fn resolve_hashed(&self, segment: &str) -> Option<&str> {
        let (name, hash) = segment.split_once(HASH_SEPARATOR)?;
        let (registered, token) = self.hashes.get_key_value(name)?;
        (token.as_str() == hash).then_some(registered.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &HashToken)> {
        self.hashes.iter().map(|(name, token)| (name.as_str(), token))
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Path segment for a hashed dataset.
pub fn hashed_segment(name: &str, token: &HashToken) -> String {
    format!("{}{}{}", name, HASH_SEPARATOR, token)
}
