//! Helpers for integration tests: a bundled, throwaway PostgreSQL server.
//!
//! Only compiled with the `test-utils` feature; the bundled binaries make
//! the build heavy, so live-database tests opt in explicitly.

use postgresql_embedded::PostgreSQL;

use crate::config::{DbSettings, PoolSettings};

/// A running embedded PostgreSQL instance plus settings pointing at it.
pub struct EmbeddedDb {
    postgresql: PostgreSQL,
    pub settings: DbSettings,
}

impl EmbeddedDb {
    /// Set up, start, and provision a database named `dbname`.
    ///
    /// # Errors
    /// Returns an error if the bundled server cannot be set up or started,
    /// or if database provisioning fails.
    pub async fn start(dbname: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut postgresql = PostgreSQL::default();
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(dbname).await?;

        let embedded = postgresql.settings();
        let settings = DbSettings {
            host: embedded.host.clone(),
            port: embedded.port,
            user: embedded.username.clone(),
            password: embedded.password.clone(),
            dbname: dbname.to_string(),
            pool: PoolSettings::default(),
        };
        tracing::info!(port = settings.port, "embedded postgres started");

        Ok(Self {
            postgresql,
            settings,
        })
    }

    /// Stop the embedded server, discarding its data directory.
    pub async fn stop(self) {
        let _ = self.postgresql.stop().await;
    }
}
