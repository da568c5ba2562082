mod common;

use axum::http::StatusCode;
use serde_json::json;
use talentflow_backend::config::Config;

use common::{app, app_with, send, test_config};

async fn create(app: &axum::Router, title: &str, status: &str) -> serde_json::Value {
    let (code, job) = send(
        app,
        "POST",
        "/api/jobs",
        Some(json!({ "title": title, "status": status, "tags": ["Remote"] })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    job
}

#[tokio::test]
async fn create_assigns_next_order_and_is_searchable() {
    let (app, _) = app().await;

    let first = create(&app, "Frontend Engineer", "active").await;
    assert_eq!(first["order"], 0);
    assert_eq!(first["slug"], "frontend-engineer");

    let (code, job) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(json!({
            "title": "Backend Engineer",
            "slug": "backend-engineer",
            "status": "active",
            "tags": ["Node.js"]
        })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(job["order"], 1);
    assert_eq!(job["tags"], json!(["Node.js"]));

    let (code, list) = send(&app, "GET", "/api/jobs?status=active&search=BACKEND", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert_eq!(list["data"][0]["id"], job["id"]);
    assert_eq!(list["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn create_rejects_empty_title() {
    let (app, _) = app().await;
    let (code, body) = send(&app, "POST", "/api/jobs", Some(json!({ "title": "" }))).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn second_page_holds_items_eleven_to_twenty() {
    let (app, _) = app().await;
    for i in 0..25 {
        let status = if i % 5 == 4 { "archived" } else { "active" };
        create(&app, &format!("Role {:02}", i), status).await;
    }

    let (code, list) = send(&app, "GET", "/api/jobs?page=2&pageSize=10", None).await;
    assert_eq!(code, StatusCode::OK);
    let orders: Vec<i64> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, (10..20).collect::<Vec<_>>());
    assert_eq!(
        list["pagination"],
        json!({ "page": 2, "pageSize": 10, "totalPages": 3, "totalItems": 25 })
    );

    let (_, archived) = send(&app, "GET", "/api/jobs?status=archived", None).await;
    assert_eq!(archived["pagination"]["totalItems"], 5);
    assert_eq!(archived["pagination"]["totalPages"], 1);

    let (_, unknown) = send(&app, "GET", "/api/jobs?status=draft", None).await;
    assert_eq!(unknown["data"], json!([]));
    assert_eq!(unknown["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn patch_updates_fields_and_404s_on_missing_job() {
    let (app, _) = app().await;
    let job = create(&app, "QA Engineer", "active").await;
    let id = job["id"].as_str().unwrap();

    let (code, updated) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", id),
        Some(json!({ "status": "archived", "tags": ["GraphQL", "Remote"] })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(updated["status"], "archived");
    assert_eq!(updated["title"], "QA Engineer");
    assert_eq!(updated["tags"], json!(["GraphQL", "Remote"]));

    let (code, fetched) = send(&app, "GET", &format!("/api/jobs/{}", id), None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(fetched, updated);

    let missing = uuid::Uuid::new_v4();
    let (code, body) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", missing),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(code, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn reorder_moves_job_and_keeps_orders_contiguous() {
    let (app, _) = app().await;
    let mut ids = Vec::new();
    for title in ["A", "B", "C", "D", "E"] {
        ids.push(create(&app, title, "active").await["id"].clone());
    }

    let (code, body) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}/reorder", ids[0].as_str().unwrap()),
        Some(json!({ "toOrder": 3 })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, list) = send(&app, "GET", "/api/jobs", None).await;
    let titles: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "C", "D", "A", "E"]);
    let orders: Vec<i64> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn injected_reorder_failure_is_an_empty_500_and_changes_nothing() {
    let config = Config {
        reorder_failure_rate: 1.0,
        ..test_config()
    };
    let (app, _) = app_with(&config).await;
    let a = create(&app, "A", "active").await;
    create(&app, "B", "active").await;

    let (code, body) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}/reorder", a["id"].as_str().unwrap()),
        Some(json!({ "toOrder": 1 })),
    )
    .await;
    assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_null());

    let (_, list) = send(&app, "GET", "/api/jobs", None).await;
    assert_eq!(list["data"][0]["title"], "A");
    assert_eq!(list["data"][0]["order"], 0);
}

#[tokio::test]
async fn patching_order_moves_the_job_instead_of_duplicating() {
    let (app, _) = app().await;
    create(&app, "A", "active").await;
    create(&app, "B", "active").await;
    let c = create(&app, "C", "active").await;

    let (code, job) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", c["id"].as_str().unwrap()),
        Some(json!({ "order": 0, "title": "C2" })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(job["order"], 0);
    assert_eq!(job["title"], "C2");

    let (_, list) = send(&app, "GET", "/api/jobs", None).await;
    let rows: Vec<(&str, i64)> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| (job["title"].as_str().unwrap(), job["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(rows, vec![("C2", 0), ("A", 1), ("B", 2)]);
}

#[tokio::test]
async fn injected_reorder_failure_skips_the_normal_latency() {
    let config = Config {
        latency_min_ms: 400,
        latency_max_ms: 400,
        reorder_failure_rate: 1.0,
        reorder_failure_delay_ms: 50,
        ..test_config()
    };
    let (app, _) = app_with(&config).await;
    let job = create(&app, "A", "active").await;

    let started = std::time::Instant::now();
    let (code, _) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}/reorder", job["id"].as_str().unwrap()),
        Some(json!({ "toOrder": 0 })),
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(elapsed >= std::time::Duration::from_millis(50));
    assert!(elapsed < std::time::Duration::from_millis(350), "took {:?}", elapsed);
}
