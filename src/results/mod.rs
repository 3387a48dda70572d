//! Untyped row and result-set model shared by the fetch, filter, and HTTP
//! layers.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::GridRow;
