//! Client-side substring filtering over fetched rows.
//!
//! Stateless by design: row counts are small (hundreds at most), so every
//! call recomputes the match from scratch instead of maintaining an index.

use std::borrow::Cow;

use crate::results::GridRow;

/// Narrow `rows` to those containing `term` as a case-insensitive substring
/// in any column's stringified value.
///
/// An empty term is the identity and borrows the input unchanged. The output
/// is always an ordered subsequence of the input.
#[must_use]
pub fn filter_rows<'a>(rows: &'a [GridRow], term: &str) -> Cow<'a, [GridRow]> {
    if term.is_empty() {
        return Cow::Borrowed(rows);
    }
    let needle = term.to_lowercase();
    Cow::Owned(
        rows.iter()
            .filter(|row| row_matches(row, &needle))
            .cloned()
            .collect(),
    )
}

/// True if any cell of `row` contains `needle_lower` (already lower-cased).
///
/// Null cells have no string form and never match.
#[must_use]
pub fn row_matches(row: &GridRow, needle_lower: &str) -> bool {
    row.values().iter().any(|value| {
        value
            .display_string()
            .is_some_and(|s| s.to_lowercase().contains(needle_lower))
    })
}
