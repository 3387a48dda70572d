use std::sync::Arc;

use crate::types::CellValue;

use super::row::GridRow;

/// The rows produced by one query execution, in the query's natural order.
///
/// Immutable once handed out by the fetcher. Column names are stored once
/// and shared with every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<GridRow>,
    columns: Arc<Vec<String>>,
}

impl ResultSet {
    /// Create an empty result set with known column names and row capacity.
    #[must_use]
    pub fn with_columns(columns: Arc<Vec<String>>, capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            columns,
        }
    }

    /// Append a row built from values in column order.
    pub fn push_values(&mut self, values: Vec<CellValue>) {
        self.rows.push(GridRow::new(self.columns.clone(), values));
    }

    /// Column names recorded for this result set.
    ///
    /// Distinct from [`crate::schema::infer_columns`]: this is the statement
    /// metadata, which may be non-empty even when zero rows came back.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
