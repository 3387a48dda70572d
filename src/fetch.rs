//! Row fetching: one fixed query through the pool into an untyped
//! [`ResultSet`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use tokio_postgres::Row;

use crate::error::GridError;
use crate::pool::DbPool;
use crate::results::ResultSet;
use crate::types::CellValue;

/// Something that can produce the grid's rows. The controller and the HTTP
/// layer depend on this seam, so tests can drive them with stub sources.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch a full result set, or fail; never a partial result.
    async fn fetch(&self) -> Result<ResultSet, GridError>;
}

/// Fetches rows from PostgreSQL through a [`DbPool`] with a fixed query.
#[derive(Debug, Clone)]
pub struct PgRowFetcher {
    pool: DbPool,
    query: String,
}

impl PgRowFetcher {
    #[must_use]
    pub fn new(pool: DbPool, query: impl Into<String>) -> Self {
        Self {
            pool,
            query: query.into(),
        }
    }
}

#[async_trait]
impl RowSource for PgRowFetcher {
    async fn fetch(&self) -> Result<ResultSet, GridError> {
        // The lease drops at the end of this scope on every path, success or
        // error, returning the connection to the pool.
        let conn = self.pool.acquire().await?;
        let rows = conn
            .query(self.query.as_str(), &[])
            .await
            .map_err(|e| GridError::Query(e.to_string()))?;
        let result_set = build_result_set(&rows)?;
        tracing::debug!(rows = result_set.len(), "fetched result set");
        Ok(result_set)
    }
}

/// Materialize driver rows into the untyped row model, preserving the
/// statement's column order.
///
/// # Errors
/// `GridError::Query` if any cell fails to decode.
pub fn build_result_set(rows: &[Row]) -> Result<ResultSet, GridError> {
    let Some(first) = rows.first() else {
        return Ok(ResultSet::default());
    };

    let columns: Vec<String> = first.columns().iter().map(|c| c.name().to_string()).collect();
    let column_count = columns.len();
    let mut result_set = ResultSet::with_columns(Arc::new(columns), rows.len());

    for row in rows {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_cell(row, idx)?);
        }
        result_set.push_values(values);
    }

    Ok(result_set)
}

/// Decode one cell into the closed [`CellValue`] variant based on the
/// column's PostgreSQL type. Unknown types fall back to text.
fn extract_cell(row: &Row, idx: usize) -> Result<CellValue, GridError> {
    let type_name = row.columns()[idx].type_().name().to_string();
    let cell = match type_name.as_str() {
        "int2" => cell_from(row, idx, &type_name, |v: i16| CellValue::Int(v.into()))?,
        "int4" => cell_from(row, idx, &type_name, |v: i32| CellValue::Int(v.into()))?,
        "int8" => cell_from(row, idx, &type_name, CellValue::Int)?,
        "float4" => cell_from(row, idx, &type_name, |v: f32| CellValue::Float(v.into()))?,
        "float8" => cell_from(row, idx, &type_name, CellValue::Float)?,
        "bool" => cell_from(row, idx, &type_name, CellValue::Bool)?,
        "timestamp" => cell_from(row, idx, &type_name, CellValue::Timestamp)?,
        "timestamptz" => cell_from(row, idx, &type_name, |v: DateTime<Utc>| {
            CellValue::Timestamp(v.naive_utc())
        })?,
        "date" => cell_from(row, idx, &type_name, |v: NaiveDate| {
            CellValue::Timestamp(NaiveDateTime::new(v, NaiveTime::MIN))
        })?,
        "json" | "jsonb" => cell_from::<JsonValue, _>(row, idx, &type_name, CellValue::Json)?,
        _ => cell_from(row, idx, &type_name, CellValue::Text)?,
    };
    Ok(cell)
}

fn cell_from<'a, T, F>(
    row: &'a Row,
    idx: usize,
    type_name: &str,
    wrap: F,
) -> Result<CellValue, GridError>
where
    T: tokio_postgres::types::FromSql<'a>,
    F: FnOnce(T) -> CellValue,
{
    let value: Option<T> = row
        .try_get(idx)
        .map_err(|e| GridError::Query(format!("failed to decode {type_name} column {idx}: {e}")))?;
    Ok(value.map_or(CellValue::Null, wrap))
}
