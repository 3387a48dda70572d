use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::types::CellValue;

/// One row of a query result: ordered values plus the column names they
/// belong to.
///
/// Column names are shared across all rows of a result set via `Arc`, so a
/// row is cheap to clone. Values are kept in the driver's column order; that
/// order drives display column order and JSON key order downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    columns: Arc<Vec<String>>,
    values: Vec<CellValue>,
}

impl GridRow {
    #[must_use]
    pub fn new(columns: Arc<Vec<String>>, values: Vec<CellValue>) -> Self {
        Self { columns, values }
    }

    /// Column names for this row, in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values for this row, in the same order as [`columns`](Self::columns).
    #[must_use]
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Look up a value by column name.
    ///
    /// Row counts are small here, so a linear scan beats maintaining an
    /// index.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Render this row as a JSON object, keys in column order.
    ///
    /// A row may carry fewer values than columns (ragged rows are accepted,
    /// not an error); missing cells are simply absent from the object.
    #[must_use]
    pub fn to_json_object(&self) -> JsonValue {
        let mut object = JsonMap::with_capacity(self.values.len());
        for (name, value) in self.columns.iter().zip(&self.values) {
            object.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(object)
    }
}
