use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// One entry of `/-/databases.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    /// Published name: `<name>_<hash>` for immutable databases.
    pub name: String,
    pub path: String,
    pub is_mutable: bool,
    /// Full content digest, immutable databases only.
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub url: String,
    pub tables: Vec<String>,
}

/// Body of `/-/hashed-urls.json`.
#[derive(Debug, Clone, Serialize)]
pub struct HashedUrlsInfo {
    pub max_age: u64,
    pub redirect_max_age: u64,
    /// Logical name to hash token.
    pub databases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseResponse {
    pub database: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub database: String,
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowResponse {
    pub database: String,
    pub table: String,
    pub pk: String,
    pub row: Map<String, Value>,
}
