use serde_json::json;
use talentflow_backend::database::{
    pool::{create_pool, open_store},
    schema::REVISIONS,
    DocumentStore, Query, SqliteStore,
};
use talentflow_backend::error::Error;
use tokio_test::{assert_err, assert_ok};

fn database_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}", dir.path().join("talentflow.db").display())
}

#[tokio::test]
async fn upgrading_the_schema_keeps_existing_documents() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);

    let v1 = SqliteStore::open_with(create_pool(&url).await.unwrap(), &REVISIONS[..1])
        .await
        .unwrap();
    assert_eq!(v1.schema_version().await.unwrap(), 1);
    v1.insert(
        "jobs",
        json!({ "id": "job-1", "title": "Designer", "slug": "designer", "status": "active", "tags": [], "order": 0 }),
    )
    .await
    .unwrap();
    assert!(matches!(
        v1.get("assessments", "job-1").await,
        Err(Error::Store(_))
    ));
    v1.pool().close().await;

    let v2 = open_store(&url).await.unwrap();
    assert_eq!(v2.schema_version().await.unwrap(), 2);
    let job = v2.get("jobs", "job-1").await.unwrap().unwrap();
    assert_eq!(job["title"], "Designer");
    assert_eq!(
        v2.count("jobs", &Query::new().eq("status", "active")).await.unwrap(),
        1
    );

    assert_ok!(
        v2.put("assessments", json!({ "id": "a-1", "jobId": "job-1", "sections": [] }))
            .await
    );
    assert!(v2.get("assessments", "job-1").await.unwrap().is_some());
    v2.pool().close().await;

    // Opening an up-to-date store applies nothing.
    let again = open_store(&url).await.unwrap();
    assert_eq!(again.schema_version().await.unwrap(), 2);
    assert_eq!(again.count("jobs", &Query::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn newer_store_is_not_downgraded() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);

    open_store(&url).await.unwrap().pool().close().await;

    let pool = create_pool(&url).await.unwrap();
    assert_err!(SqliteStore::open_with(pool, &REVISIONS[..1]).await);
}

#[tokio::test]
async fn updates_and_deletes_report_affected_counts() {
    let store = open_store("sqlite::memory:").await.unwrap();
    store
        .insert(
            "candidates",
            json!({ "id": "c-1", "name": "Ada", "email": "ada@example.com", "jobId": "j", "stage": "applied" }),
        )
        .await
        .unwrap();

    assert_eq!(
        store.update("candidates", "c-1", json!({ "stage": "screen" })).await.unwrap(),
        1
    );
    assert_eq!(
        store.update("candidates", "nope", json!({ "stage": "screen" })).await.unwrap(),
        0
    );
    assert_eq!(store.delete("candidates", "c-1").await.unwrap(), 1);
    assert_eq!(store.delete("candidates", "c-1").await.unwrap(), 0);
    assert!(store.get("candidates", "c-1").await.unwrap().is_none());
}
