use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use station_grid::config::AppConfig;
use station_grid::fetch::PgRowFetcher;
use station_grid::http::{self, AppState};
use station_grid::pool::DbPool;

/// Serve an arbitrary table's top rows as a filterable data grid.
#[derive(Parser)]
#[command(name = "station-grid", version)]
struct Cli {
    /// Listen port; overrides API_PORT.
    #[arg(long)]
    port: Option<u16>,

    /// SQL issued on each data fetch; overrides GRID_QUERY.
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!(error = %err, "fatal");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = cli.port {
        config.http.port = port;
    }
    if let Some(query) = cli.query {
        config.query = query;
    }

    // Eager startup: the process does not become ready if the database is
    // unreachable.
    let pool = DbPool::connect(&config.db).await?;
    let reaper = pool.spawn_idle_reaper(config.db.pool.idle_timeout);

    let source = Arc::new(PgRowFetcher::new(pool.clone(), config.query.clone()));
    let app = http::router(AppState::new(source), &config.http.cors_origin)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http.port)).await?;
    tracing::info!(port = config.http.port, "serving /api/data and /api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reaper.abort();
    pool.shutdown();
    tracing::info!("disconnected from postgres");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
