//! Display-schema inference.

use crate::results::ResultSet;

/// Derive the displayed column set from the shape of the first row.
///
/// Returns the first row's column names in source order; that order drives
/// display column order, so no sorting is applied. An empty result set gives
/// an empty column set, which is the "no data" condition rather than an
/// error. Later rows are never inspected; rows whose columns are a superset
/// or subset of row 0 are accepted and simply display ragged.
#[must_use]
pub fn infer_columns(rs: &ResultSet) -> Vec<String> {
    rs.rows
        .first()
        .map(|row| row.columns().to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::results::{GridRow, ResultSet};
    use crate::types::CellValue;

    use super::*;

    #[test]
    fn columns_come_from_first_row_in_source_order() {
        // Deliberately non-alphabetical order; inference must preserve it.
        let mut rs = ResultSet::with_columns(
            Arc::new(vec!["serial".into(), "id".into(), "passed".into()]),
            1,
        );
        rs.push_values(vec![
            CellValue::Text("X1".into()),
            CellValue::Int(1),
            CellValue::Bool(true),
        ]);
        assert_eq!(infer_columns(&rs), ["serial", "id", "passed"]);
    }

    #[test]
    fn empty_result_set_has_no_columns() {
        assert!(infer_columns(&ResultSet::default()).is_empty());
        // Statement metadata may know the columns, but with zero rows the
        // displayed column set is still empty.
        let rs = ResultSet::with_columns(Arc::new(vec!["id".into()]), 0);
        assert!(infer_columns(&rs).is_empty());
    }

    #[test]
    fn ragged_later_rows_are_ignored() {
        let mut rs = ResultSet::with_columns(Arc::new(vec!["id".into(), "name".into()]), 2);
        rs.push_values(vec![CellValue::Int(1), CellValue::Text("A".into())]);
        // Second row from a different shape entirely; inference only looks
        // at row 0.
        rs.rows.push(GridRow::new(
            Arc::new(vec!["id".into(), "name".into(), "extra".into()]),
            vec![CellValue::Int(2), CellValue::Null, CellValue::Int(9)],
        ));
        assert_eq!(infer_columns(&rs), ["id", "name"]);
    }
}
