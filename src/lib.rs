//! Pooled PostgreSQL backend and filterable grid pipeline for station test
//! data.
//!
//! The pipeline: a [`pool::DbPool`] hands leases to a
//! [`fetch::PgRowFetcher`], which materializes an untyped
//! [`results::ResultSet`]; [`schema::infer_columns`] derives the display
//! columns from the first row; [`filter::filter_rows`] narrows rows by a
//! live substring term; [`controller::GridController`] ties it together
//! with loading/error/data state and stale-response suppression. The
//! [`http`] module exposes the result set over `GET /api/data`.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod http;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod schema;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::GridError;
