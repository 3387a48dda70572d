//! Environment-backed configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::GridError;

/// Query issued on every data fetch. The table name is deployment-specific;
/// override with `GRID_QUERY`.
pub const DEFAULT_QUERY: &str = "SELECT * FROM public.test_station_1 LIMIT 100";

/// Bounds and timeouts for the connection pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on concurrently leased connections.
    pub max_connections: usize,
    /// Connections warmed up at startup (beyond the connectivity probe).
    pub min_idle: usize,
    /// Idle connections older than this are reclaimed.
    pub idle_timeout: Duration,
    /// Bound on establishing a physical connection.
    pub connect_timeout: Duration,
    /// Bound on waiting for a free lease when the pool is exhausted.
    pub wait_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_idle: 0,
            idle_timeout: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(30_000),
            wait_timeout: Duration::from_millis(30_000),
        }
    }
}

/// Where and how to reach PostgreSQL.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub pool: PoolSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub port: u16,
    pub cors_origin: String,
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbSettings,
    pub http: HttpSettings,
    pub query: String,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `GridError::Config` if `POSTGRES_PASSWORD` is absent or any
    /// numeric variable fails to parse.
    pub fn from_env() -> Result<Self, GridError> {
        let password = env::var("POSTGRES_PASSWORD")
            .map_err(|_| GridError::Config("POSTGRES_PASSWORD is required".to_string()))?;

        let pool = PoolSettings {
            max_connections: env_or("POOL_MAX_CONNECTIONS", 10)?,
            min_idle: env_or("POOL_MIN_IDLE", 0)?,
            idle_timeout: Duration::from_millis(env_or("POOL_IDLE_TIMEOUT_MS", 30_000)?),
            connect_timeout: Duration::from_millis(env_or("POOL_CONNECT_TIMEOUT_MS", 30_000)?),
            wait_timeout: Duration::from_millis(env_or("POOL_WAIT_TIMEOUT_MS", 30_000)?),
        };

        Ok(Self {
            db: DbSettings {
                host: env_or_str("POSTGRES_HOST", "localhost"),
                port: env_or("POSTGRES_PORT", 5432)?,
                user: env_or_str("POSTGRES_USER", "postgres"),
                password,
                dbname: env_or_str("POSTGRES_DATABASE", "TestStandDB"),
                pool,
            },
            http: HttpSettings {
                port: env_or("API_PORT", 3000)?,
                cors_origin: env_or_str("CORS_ORIGIN", "http://localhost:4200"),
            },
            query: env_or_str("GRID_QUERY", DEFAULT_QUERY),
        })
    }
}

fn env_or_str(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T, GridError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| GridError::Config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
