//! Dataset descriptors handed to the registry at startup.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Whether the host may modify a dataset while the process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Mutable,
    Immutable,
}

/// Full SHA-256 hex digest of a dataset's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Digest an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_hasher(hasher)
    }

    /// Finish a hasher that was fed incrementally, e.g. while streaming a file.
    pub fn from_hasher(hasher: Sha256) -> Self {
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dataset as known to the host at startup.
///
/// Immutable datasets carry the digest of their content; mutable ones never
/// need one since they are not hashed.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub mutability: Mutability,
    pub digest: Option<ContentDigest>,
}

impl Dataset {
    pub fn mutable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mutability: Mutability::Mutable,
            digest: None,
        }
    }

    pub fn immutable(name: impl Into<String>, digest: ContentDigest) -> Self {
        Self {
            name: name.into(),
            mutability: Mutability::Immutable,
            digest: Some(digest),
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::Mutable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(
            ContentDigest::of_bytes(b"rows"),
            ContentDigest::of_bytes(b"rows")
        );
    }

    #[test]
    fn test_digest_changes_with_content() {
        assert_ne!(
            ContentDigest::of_bytes(b"rows"),
            ContentDigest::of_bytes(b"rows!")
        );
    }

    #[test]
    fn test_digest_format() {
        let digest = ContentDigest::of_bytes(b"");
        assert_eq!(digest.as_str().len(), 64);
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Sha256::new();
        hasher.update(b"abc");
        hasher.update(b"def");
        assert_eq!(
            ContentDigest::from_hasher(hasher),
            ContentDigest::of_bytes(b"abcdef")
        );
    }

    #[test]
    fn test_constructors_set_mutability() {
        assert!(Dataset::mutable("m").is_mutable());
        let d = Dataset::immutable("i", ContentDigest::of_bytes(b"x"));
        assert!(!d.is_mutable());
        assert!(d.digest.is_some());
    }
}
