//! Dataset loading.

use std::path::{Path, PathBuf};
use std::time::Instant;

use hashed_urls_core::{ContentDigest, Dataset, Mutability};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

const READ_CHUNK: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot derive a database name from {path}")]
    InvalidName { path: PathBuf },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },
}

/// An opened SQLite file.
#[derive(Debug, Clone)]
pub struct Database {
    pub name: String,
    pub path: PathBuf,
    pub mutability: Mutability,
    pub digest: Option<ContentDigest>,
    pub pool: SqlitePool,
}

impl Database {
    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::Mutable
    }

    pub fn dataset(&self) -> Dataset {
        Dataset {
            name: self.name.clone(),
            mutability: self.mutability,
            digest: self.digest.clone(),
        }
    }
}

/// All databases served by this process, in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    databases: Vec<Database>,
}

impl Catalog {
    /// Open mutable `files` followed by `immutables`.
    ///
    /// Names are not validated here; that is the registry's job, so that a
    /// bad name fails with the registry's message.
    pub async fn open(files: &[PathBuf], immutables: &[PathBuf]) -> Result<Self, DatasetError> {
        let mut databases = Vec::with_capacity(files.len() + immutables.len());
        for path in files {
            databases.push(open_database(path, Mutability::Mutable).await?);
        }
        for path in immutables {
            databases.push(open_database(path, Mutability::Immutable).await?);
        }
        Ok(Self { databases })
    }

    pub fn datasets(&self) -> Vec<Dataset> {
        self.databases.iter().map(Database::dataset).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Database> {
        self.databases.iter().find(|db| db.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Database> {
        self.databases.iter()
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

#[instrument(skip(path), fields(path = %path.display()))]
async fn open_database(path: &Path, mutability: Mutability) -> Result<Database, DatasetError> {
    let name = database_name(path)?;

    let digest = match mutability {
        Mutability::Immutable => Some(digest_file(path).await?),
        Mutability::Mutable => None,
    };

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .immutable(mutability == Mutability::Immutable);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    info!(database = %name, ?mutability, "Opened database");

    Ok(Database {
        name,
        path: path.to_path_buf(),
        mutability,
        digest,
        pool,
    })
}

fn database_name(path: &Path) -> Result<String, DatasetError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DatasetError::InvalidName {
            path: path.to_path_buf(),
        })
}

/// SHA-256 of a file's bytes, read in chunks.
pub async fn digest_file(path: &Path) -> Result<ContentDigest, DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let started = Instant::now();
    let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    let mut total = 0u64;
    loop {
        let n = file.read(&mut buf).await.map_err(io_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    let digest = ContentDigest::from_hasher(hasher);
    info!(
        bytes = total,
        elapsed_ms = %started.elapsed().as_millis(),
        digest = %digest,
        "Hashed database file"
    );
    Ok(digest)
}
