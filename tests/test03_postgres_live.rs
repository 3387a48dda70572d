#![cfg(feature = "test-utils")]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use station_grid::prelude::*;
use station_grid::test_utils::EmbeddedDb;

#[tokio::test]
async fn end_to_end_against_live_postgres() {
    let db = EmbeddedDb::start("grid_test").await.expect("embedded postgres");

    let mut settings = db.settings.clone();
    settings.pool.max_connections = 2;
    settings.pool.wait_timeout = Duration::from_millis(250);

    let pool = DbPool::connect(&settings).await.expect("pool connects");

    {
        let conn = pool.acquire().await.expect("lease for setup");
        conn.batch_execute(
            "CREATE TABLE test_station_1 (id BIGINT PRIMARY KEY, name TEXT);
             INSERT INTO test_station_1 (id, name) VALUES (1, 'Alice'), (2, 'Bob');",
        )
        .await
        .expect("table setup");
    }

    // The pool never leases beyond max_connections; the third acquire times
    // out, and a released lease frees the slot exactly once.
    let first = pool.acquire().await.expect("first lease");
    let second = pool.acquire().await.expect("second lease");
    assert_eq!(pool.leased(), 2);
    match pool.acquire().await {
        Err(GridError::PoolExhaustedTimeout(_)) => {}
        other => panic!("expected PoolExhaustedTimeout, got {other:?}"),
    }
    drop(first);
    let third = pool.acquire().await.expect("lease after release");
    drop(second);
    drop(third);

    // Fetch, infer, filter.
    let fetcher = PgRowFetcher::new(
        pool.clone(),
        "SELECT id, name FROM test_station_1 ORDER BY id",
    );
    let rs = fetcher.fetch().await.expect("fetch");
    assert_eq!(rs.len(), 2);
    assert_eq!(infer_columns(&rs), ["id", "name"]);
    let filtered = filter_rows(&rs.rows, "ali");
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered[0].get("name"),
        Some(&CellValue::Text("Alice".into()))
    );

    // HTTP surface over the live database.
    let app = router(
        AppState::new(Arc::new(fetcher.clone())),
        "http://localhost:4200",
    )
    .expect("router");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Alice");

    // A broken query surfaces as 500 with an error field, not a crash.
    let bad = PgRowFetcher::new(pool.clone(), "SELECT * FROM no_such_table");
    let bad_app = router(AppState::new(Arc::new(bad)), "http://localhost:4200").expect("router");
    let response = bad_app
        .oneshot(
            Request::builder()
                .uri("/api/data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Database query failed");
    // And the connection was released despite the failure.
    assert_eq!(pool.leased(), 0);

    // Empty-but-successful is its own state, not a failure.
    let empty = PgRowFetcher::new(
        pool.clone(),
        "SELECT id, name FROM test_station_1 WHERE id < 0",
    );
    let controller = GridController::new(Arc::new(empty));
    controller.load().await;
    assert_eq!(controller.state(), FetchState::Empty);

    // Shutdown drains and refuses further leases.
    pool.shutdown();
    match pool.acquire().await {
        Err(GridError::PoolClosed) => {}
        other => panic!("expected PoolClosed, got {other:?}"),
    }

    db.stop().await;
}
