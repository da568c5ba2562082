#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use talentflow_backend::{
    config::Config,
    database::{pool::create_pool, SqliteStore},
    routes, AppState,
};
use tower::ServiceExt;

/// No latency, no injected faults, small seed targets.
pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        latency_min_ms: 0,
        latency_max_ms: 0,
        reorder_failure_rate: 0.0,
        reorder_failure_delay_ms: 0,
        seed_job_count: 12,
        seed_candidate_count: 40,
        seed_on_startup: false,
    }
}

pub async fn memory_store() -> SqliteStore {
    let pool = create_pool("sqlite::memory:").await.expect("pool");
    SqliteStore::open(pool).await.expect("store")
}

pub async fn app_with(config: &Config) -> (Router, AppState) {
    let store = memory_store().await;
    let state = AppState::new(Arc::new(store), config);
    (routes::router(state.clone()), state)
}

pub async fn app() -> (Router, AppState) {
    app_with(&test_config()).await
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
