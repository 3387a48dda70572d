//! Bounded PostgreSQL connection pool with an explicit lifecycle.
//!
//! Connections are leased for the duration of one query and returned on drop
//! of the lease, so release is RAII and idempotent by construction. The pool
//! is created at process start (eager: the startup probe must succeed before
//! the process is considered ready) and closed at process stop.

use std::time::Duration;

use deadpool::managed::{PoolConfig, Timeouts};
use deadpool_postgres::{Config as PgConfig, Object, Pool, Runtime};
use tokio_postgres::NoTls;

use crate::config::DbSettings;
use crate::error::GridError;

/// A leased connection. Dropping it returns the slot to the pool; dropping
/// it a second time is impossible, which makes release a no-op to misuse.
pub type PooledConnection = Object;

/// Owned connection pool; cheap to clone and share across request handlers.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool,
    wait_timeout: Duration,
}

impl DbPool {
    /// Create the pool and eagerly verify connectivity.
    ///
    /// Fails fast with `GridError::Connectivity` if the initial connection
    /// cannot be established, so a misconfigured process never becomes
    /// ready. Also warms up `min_idle` connections when configured.
    ///
    /// # Errors
    /// `GridError::Config` if pool creation rejects the configuration,
    /// `GridError::Connectivity` if the startup probe fails.
    pub async fn connect(settings: &DbSettings) -> Result<Self, GridError> {
        let mut cfg = PgConfig::new();
        cfg.host = Some(settings.host.clone());
        cfg.port = Some(settings.port);
        cfg.user = Some(settings.user.clone());
        cfg.password = Some(settings.password.clone());
        cfg.dbname = Some(settings.dbname.clone());
        cfg.connect_timeout = Some(settings.pool.connect_timeout);

        let mut pool_cfg = PoolConfig::new(settings.pool.max_connections);
        pool_cfg.timeouts = Timeouts {
            wait: Some(settings.pool.wait_timeout),
            create: Some(settings.pool.connect_timeout),
            recycle: Some(settings.pool.connect_timeout),
        };
        cfg.pool = Some(pool_cfg);

        let inner = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| GridError::Config(format!("failed to create pool: {e}")))?;

        let pool = Self {
            inner,
            wait_timeout: settings.pool.wait_timeout,
        };

        // Startup probe; the lease drops (and returns) at end of scope.
        {
            let conn = pool
                .acquire()
                .await
                .map_err(|e| GridError::Connectivity(e.to_string()))?;
            conn.simple_query("SELECT 1")
                .await
                .map_err(|e| GridError::Connectivity(e.to_string()))?;
        }
        tracing::info!(
            host = %settings.host,
            dbname = %settings.dbname,
            max_connections = settings.pool.max_connections,
            "connected to postgres"
        );

        if settings.pool.min_idle > 0 {
            let mut warm = Vec::with_capacity(settings.pool.min_idle);
            for _ in 0..settings.pool.min_idle.min(settings.pool.max_connections) {
                warm.push(pool.acquire().await?);
            }
            // Dropping the leases leaves the connections idle in the pool.
        }

        Ok(pool)
    }

    /// Lease a connection, waiting up to the configured bound if all
    /// connections are currently leased.
    ///
    /// # Errors
    /// `GridError::PoolExhaustedTimeout` if no connection frees in time,
    /// `GridError::PoolClosed` after [`shutdown`](Self::shutdown),
    /// `GridError::Connectivity` if establishing a connection fails.
    pub async fn acquire(&self) -> Result<PooledConnection, GridError> {
        self.inner
            .get()
            .await
            .map_err(|e| GridError::from_pool_error(e, self.wait_timeout))
    }

    /// Number of connections currently leased out.
    #[must_use]
    pub fn leased(&self) -> usize {
        let status = self.inner.status();
        status.size.saturating_sub(status.available)
    }

    /// Background task reclaiming connections idle beyond `idle_timeout`.
    /// The task exits on its own once the pool is shut down.
    pub fn spawn_idle_reaper(&self, idle_timeout: Duration) -> tokio::task::JoinHandle<()> {
        let pool = self.inner.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(idle_timeout);
            tick.tick().await;
            loop {
                tick.tick().await;
                if pool.is_closed() {
                    break;
                }
                let _ = pool.retain(|_, metrics| metrics.last_used() < idle_timeout);
                tracing::trace!(status = ?pool.status(), "reaped idle connections");
            }
        })
    }

    /// Close the pool. In-flight leases finish their work and their
    /// connections are discarded on return; subsequent `acquire` calls fail
    /// with `GridError::PoolClosed`.
    pub fn shutdown(&self) {
        tracing::info!("closing connection pool");
        self.inner.close();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl std::fmt::Debug for DbPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbPool")
            .field("status", &self.inner.status())
            .field("wait_timeout", &self.wait_timeout)
            .finish()
    }
}
