//! Read-only lookups against a dataset.
//!
//! Table and column names are checked against the schema before they are
//! interpolated into SQL; values are always bound.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqlitePool, TypeInfo, ValueRef};

/// Column metadata from `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// 1-based position in the primary key, 0 when not part of it.
    pub pk: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRows {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name"#,
    )
    .fetch_all(pool)
    .await
}

pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnInfo>, sqlx::Error> {
    let rows = sqlx::query("SELECT name, pk FROM pragma_table_info(?) ORDER BY cid")
        .bind(table)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            Ok::<_, sqlx::Error>(ColumnInfo {
                name: row.try_get("name")?,
                pk: row.try_get("pk")?,
            })
        })
        .collect()
}

/// Rows of `table` matching every `column = value` filter.
///
/// Callers must have validated `table` and every filter column.
pub async fn fetch_rows(
    pool: &SqlitePool,
    table: &str,
    filters: &[(String, String)],
    limit: i64,
) -> Result<TableRows, sqlx::Error> {
    let mut sql = format!("SELECT * FROM {}", quote_identifier(table));
    if !filters.is_empty() {
        let clauses: Vec<String> = filters
            .iter()
            .map(|(column, _)| format!("{} = ?", quote_identifier(column)))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" LIMIT ?");

    let mut query = sqlx::query(&sql);
    for (_, value) in filters {
        query = bind_value(query, value);
    }
    let rows = query.bind(limit).fetch_all(pool).await?;

    let columns = match rows.first() {
        Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        None => table_columns(pool, table)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect(),
    };

    Ok(TableRows {
        columns,
        rows: rows.iter().map(row_to_json).collect(),
    })
}

/// Single row by primary key. Tables without a declared key use `rowid`;
/// composite keys take comma-separated values in key order.
pub async fn fetch_row(
    pool: &SqlitePool,
    table: &str,
    pk: &str,
) -> Result<Option<Map<String, Value>>, sqlx::Error> {
    let mut key_columns: Vec<ColumnInfo> = table_columns(pool, table)
        .await?
        .into_iter()
        .filter(|c| c.pk > 0)
        .collect();
    key_columns.sort_by_key(|c| c.pk);

    let (columns, values): (Vec<String>, Vec<&str>) = if key_columns.len() > 1 {
        let values: Vec<&str> = pk.split(',').collect();
        if values.len() != key_columns.len() {
            return Ok(None);
        }
        (key_columns.into_iter().map(|c| c.name).collect(), values)
    } else {
        let column = key_columns
            .pop()
            .map(|c| c.name)
            .unwrap_or_else(|| "rowid".to_string());
        (vec![column], vec![pk])
    };

    let clauses: Vec<String> = columns
        .iter()
        .map(|column| format!("{} = ?", quote_identifier(column)))
        .collect();
    let sql = format!(
        "SELECT * FROM {} WHERE {} LIMIT 1",
        quote_identifier(table),
        clauses.join(" AND ")
    );

    let mut query = sqlx::query(&sql);
    for value in values {
        query = bind_value(query, value);
    }
    let row = query.fetch_optional(pool).await?;
    Ok(row.as_ref().map(row_to_json))
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

// Integers are bound as integers so that `rowid` lookups match.
fn bind_value<'q>(query: SqliteQuery<'q>, value: &str) -> SqliteQuery<'q> {
    match value.parse::<i64>() {
        Ok(n) => query.bind(n),
        Err(_) => query.bind(value.to_string()),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_to_json(row: &SqliteRow) -> Map<String, Value> {
    let mut out = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        out.insert(column.name().to_string(), column_value(row, idx));
    }
    out
}

fn column_value(row: &SqliteRow, idx: usize) -> Value {
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" => row.try_get::<i64, _>(idx).map(Value::from).unwrap_or(Value::Null),
        "REAL" => row.try_get::<f64, _>(idx).map(Value::from).unwrap_or(Value::Null),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(idx)
            .map(|bytes| Value::String(hex::encode(bytes)))
            .unwrap_or(Value::Null),
        _ => row.try_get::<String, _>(idx).map(Value::from).unwrap_or(Value::Null),
    }
}
