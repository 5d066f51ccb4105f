use std::collections::BTreeMap;

use anyhow::anyhow;
use hashed_urls_core::{AppError, HashRegistry};
use hashed_urls_db::{Catalog, Database, queries};
use tracing::instrument;

use crate::modules::databases::model::{
    DatabaseInfo, DatabaseResponse, HashedUrlsInfo, IndexEntry, RowResponse, TableResponse,
};
use crate::state::AppState;

pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE_SIZE: i64 = 1000;

pub struct DatabaseService;

impl DatabaseService {
    pub fn list_databases(catalog: &Catalog, registry: &HashRegistry) -> Vec<DatabaseInfo> {
        catalog
            .iter()
            .map(|db| DatabaseInfo {
                name: registry.public_name(&db.name),
                path: db.path.display().to_string(),
                is_mutable: db.is_mutable(),
                hash: db.digest.as_ref().map(|d| d.to_string()),
            })
            .collect()
    }

    pub fn hashed_urls_info(state: &AppState) -> HashedUrlsInfo {
        HashedUrlsInfo {
            max_age: state.plugin_config.max_age,
            redirect_max_age: state.plugin_config.redirect_max_age,
            databases: state
                .registry
                .entries()
                .map(|(name, token)| (name.to_string(), token.to_string()))
                .collect(),
        }
    }

    #[instrument(skip(state))]
    pub async fn index(state: &AppState) -> Result<Vec<IndexEntry>, AppError> {
        let mut entries = Vec::with_capacity(state.catalog.len());
        for db in state.catalog.iter() {
            let name = state.registry.public_name(&db.name);
            entries.push(IndexEntry {
                url: format!("/{}", name),
                name,
                tables: queries::list_tables(&db.pool).await?,
            });
        }
        Ok(entries)
    }

    #[instrument(skip(state))]
    pub async fn get_database(state: &AppState, name: &str) -> Result<DatabaseResponse, AppError> {
        let db = find_database(state, name)?;
        Ok(DatabaseResponse {
            database: state.registry.public_name(&db.name),
            tables: queries::list_tables(&db.pool).await?,
        })
    }

    #[instrument(skip(state))]
    pub async fn get_table(
        state: &AppState,
        name: &str,
        table: &str,
        params: BTreeMap<String, String>,
    ) -> Result<TableResponse, AppError> {
        let db = find_database(state, name)?;
        ensure_table(db, table).await?;

        let limit = match params.get("_size") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
                .ok_or_else(|| {
                    AppError::bad_request(anyhow!(
                        "_size must be an integer between 1 and {}",
                        MAX_PAGE_SIZE
                    ))
                })?,
            None => DEFAULT_PAGE_SIZE,
        };

        let columns = queries::table_columns(&db.pool, table).await?;
        let mut filters = Vec::new();
        for (column, value) in params.into_iter().filter(|(k, _)| !k.starts_with('_')) {
            if !columns.iter().any(|c| c.name == column) {
                return Err(AppError::bad_request(anyhow!(
                    "Unknown column \"{}\" in table \"{}\"",
                    column,
                    table
                )));
            }
            filters.push((column, value));
        }

        let result = queries::fetch_rows(&db.pool, table, &filters, limit).await?;
        Ok(TableResponse {
            database: state.registry.public_name(&db.name),
            table: table.to_string(),
            columns: result.columns,
            rows: result.rows,
        })
    }

    #[instrument(skip(state))]
    pub async fn get_row(
        state: &AppState,
        name: &str,
        table: &str,
        pk: &str,
    ) -> Result<RowResponse, AppError> {
        let db = find_database(state, name)?;
        ensure_table(db, table).await?;

        let row = queries::fetch_row(&db.pool, table, pk)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Record not found: {}", pk)))?;

        Ok(RowResponse {
            database: state.registry.public_name(&db.name),
            table: table.to_string(),
            pk: pk.to_string(),
            row,
        })
    }
}

fn find_database<'a>(state: &'a AppState, name: &str) -> Result<&'a Database, AppError> {
    state
        .catalog
        .get(name)
        .ok_or_else(|| AppError::not_found(anyhow!("Database not found: {}", name)))
}

async fn ensure_table(db: &Database, table: &str) -> Result<(), AppError> {
    if queries::table_exists(&db.pool, table).await? {
        Ok(())
    } else {
        Err(AppError::not_found(anyhow!("Table not found: {}", table)))
    }
}
