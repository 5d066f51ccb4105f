use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use hashed_urls_core::AppError;

use crate::modules::databases::model::{
    DatabaseInfo, DatabaseResponse, HashedUrlsInfo, IndexEntry, RowResponse, TableResponse,
};
use crate::modules::databases::service::DatabaseService;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<IndexEntry>>, AppError> {
    Ok(Json(DatabaseService::index(&state).await?))
}

pub async fn databases_json(State(state): State<AppState>) -> Json<Vec<DatabaseInfo>> {
    Json(DatabaseService::list_databases(
        &state.catalog,
        &state.registry,
    ))
}

pub async fn hashed_urls_json(State(state): State<AppState>) -> Json<HashedUrlsInfo> {
    Json(DatabaseService::hashed_urls_info(&state))
}

#[instrument(skip(state))]
pub async fn get_database(
    State(state): State<AppState>,
    Path(database): Path<String>,
) -> Result<Json<DatabaseResponse>, AppError> {
    Ok(Json(DatabaseService::get_database(&state, &database).await?))
}

#[instrument(skip(state))]
pub async fn get_table(
    State(state): State<AppState>,
    Path((database, table)): Path<(String, String)>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<TableResponse>, AppError> {
    let response = DatabaseService::get_table(&state, &database, &table, params).await?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_row(
    State(state): State<AppState>,
    Path((database, table, pk)): Path<(String, String, String)>,
) -> Result<Json<RowResponse>, AppError> {
    let response = DatabaseService::get_row(&state, &database, &table, &pk).await?;
    Ok(Json(response))
}
