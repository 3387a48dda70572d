//! Convenient imports for common functionality.

pub use crate::config::{AppConfig, DbSettings, HttpSettings, PoolSettings};
pub use crate::controller::{FetchState, GridController, LOAD_FAILED_MESSAGE};
pub use crate::error::GridError;
pub use crate::fetch::{PgRowFetcher, RowSource, build_result_set};
pub use crate::filter::{filter_rows, row_matches};
pub use crate::http::{AppState, router};
pub use crate::pool::{DbPool, PooledConnection};
pub use crate::results::{GridRow, ResultSet};
pub use crate::schema::infer_columns;
pub use crate::types::CellValue;
