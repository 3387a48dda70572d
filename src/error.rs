use std::time::Duration;

use deadpool::managed::{PoolError, TimeoutType};
use thiserror::Error;

/// Errors surfaced by the grid data pipeline.
///
/// Database-layer failures are mapped into this taxonomy at the point where
/// they occur; the HTTP boundary turns any of them into a 5xx response and
/// never lets them crash the process.
#[derive(Debug, Error)]
pub enum GridError {
    /// A physical connection could not be established or validated.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Query execution failed (syntax, permission, connection lost mid-query).
    #[error("Query error: {0}")]
    Query(String),

    /// No pooled connection became available within the wait bound.
    #[error("No pooled connection became available within {0:?}")]
    PoolExhaustedTimeout(Duration),

    /// The pool has been shut down; no further leases are possible.
    #[error("Connection pool is closed")]
    PoolClosed,

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GridError {
    /// Map a deadpool acquisition error, attributing wait timeouts to the
    /// configured wait bound.
    pub(crate) fn from_pool_error(
        err: PoolError<tokio_postgres::Error>,
        wait_timeout: Duration,
    ) -> Self {
        match err {
            PoolError::Timeout(TimeoutType::Wait) => GridError::PoolExhaustedTimeout(wait_timeout),
            PoolError::Closed => GridError::PoolClosed,
            PoolError::Backend(e) => GridError::Connectivity(e.to_string()),
            other => GridError::Connectivity(other.to_string()),
        }
    }
}
