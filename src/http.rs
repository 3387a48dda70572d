//! HTTP surface: the data and health endpoints plus CORS wiring.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tower_http::cors::CorsLayer;

use crate::error::GridError;
use crate::fetch::RowSource;

/// Shared state for request handlers. Handlers hold no request-scoped
/// mutable state; the pool behind the source is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn RowSource>,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self { source }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    details: String,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

/// Build the API router.
///
/// # Errors
/// `GridError::Config` if `cors_origin` is not a valid header value.
pub fn router(state: AppState, cors_origin: &str) -> Result<Router, GridError> {
    let origin: HeaderValue = cors_origin
        .parse()
        .map_err(|_| GridError::Config(format!("invalid CORS origin: {cors_origin}")))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]);

    Ok(Router::new()
        .route("/api/data", get(get_data))
        .route("/api/health", get(get_health))
        .layer(cors)
        .with_state(state))
}

/// `GET /api/data`: the full result set as a JSON array of row objects, in
/// the query's natural row order. Any database failure becomes a 500 with
/// `{error, details}`; it never crashes the process.
async fn get_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonValue>>, (StatusCode, Json<ErrorBody>)> {
    match state.source.fetch().await {
        Ok(result_set) => Ok(Json(
            result_set.rows.iter().map(|r| r.to_json_object()).collect(),
        )),
        Err(err) => {
            tracing::error!(error = %err, "data request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Database query failed".to_string(),
                    details: err.to_string(),
                }),
            ))
        }
    }
}

/// `GET /api/health`: liveness only, does not probe the database.
async fn get_health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}
