mod common;

use axum::http::StatusCode;
use serde_json::json;
use talentflow_backend::database::Collection;
use talentflow_backend::models::{Candidate, CandidateStage, TimelineEvent};
use talentflow_backend::utils::time;
use uuid::Uuid;

use common::{app, send};

async fn insert_candidates(state: &talentflow_backend::AppState) -> (Uuid, Vec<Candidate>) {
    let job_id = Uuid::new_v4();
    let other_job = Uuid::new_v4();
    let people = [
        ("Zoe Park", CandidateStage::Applied, job_id),
        ("Adam Stone", CandidateStage::Screen, job_id),
        ("Mia Lopez", CandidateStage::Screen, other_job),
        ("Ben Adams", CandidateStage::Rejected, job_id),
    ];
    let candidates: Vec<Candidate> = people
        .iter()
        .map(|(name, stage, job)| Candidate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            job_id: *job,
            stage: *stage,
        })
        .collect();
    Collection::<Candidate>::new(state.store.clone())
        .bulk_insert(&candidates)
        .await
        .unwrap();
    (job_id, candidates)
}

fn names(body: &serde_json::Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn list_filters_by_stage_job_and_search() {
    let (app, state) = app().await;
    let (job_id, _) = insert_candidates(&state).await;

    let (code, all) = send(&app, "GET", "/api/candidates", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(names(&all), vec!["Adam Stone", "Ben Adams", "Mia Lopez", "Zoe Park"]);

    let (_, screen) = send(&app, "GET", "/api/candidates?stage=screen", None).await;
    assert_eq!(names(&screen), vec!["Adam Stone", "Mia Lopez"]);

    let (_, for_job) = send(
        &app,
        "GET",
        &format!("/api/candidates?stage=screen&jobId={}", job_id),
        None,
    )
    .await;
    assert_eq!(names(&for_job), vec!["Adam Stone"]);

    let (_, search) = send(&app, "GET", "/api/candidates?search=ADAM", None).await;
    assert_eq!(names(&search), vec!["Adam Stone", "Ben Adams"]);

    let (_, blank) = send(&app, "GET", "/api/candidates?stage=", None).await;
    assert_eq!(blank.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn stage_change_is_recorded_on_the_timeline() {
    let (app, state) = app().await;
    let (_, candidates) = insert_candidates(&state).await;
    let zoe = &candidates[0];

    let (code, updated) = send(
        &app,
        "PATCH",
        &format!("/api/candidates/{}", zoe.id),
        Some(json!({ "stage": "tech" })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(updated["stage"], "tech");
    assert_eq!(updated["name"], "Zoe Park");

    let (code, note) = send(
        &app,
        "POST",
        &format!("/api/candidates/{}/timeline", zoe.id),
        Some(json!({ "notes": "Strong system design round" })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(note["type"], "note");

    let (code, timeline) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}/timeline", zoe.id),
        None,
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    let events: Vec<TimelineEvent> = serde_json::from_value(timeline).unwrap();
    assert_eq!(events.len(), 2);
    let stages: Vec<_> = events.iter().filter_map(TimelineEvent::stage).collect();
    assert_eq!(stages, vec![CandidateStage::Tech]);
    assert!(events[0].date <= events[1].date);
}

#[tokio::test]
async fn timeline_is_sorted_by_date() {
    let (app, state) = app().await;
    let (_, candidates) = insert_candidates(&state).await;
    let ben = candidates[3].id;

    let base = time::now() - chrono::Duration::days(10);
    let events = vec![
        TimelineEvent::stage_change(ben, CandidateStage::Rejected, base + chrono::Duration::days(3)),
        TimelineEvent::stage_change(ben, CandidateStage::Applied, base),
        TimelineEvent::stage_change(ben, CandidateStage::Screen, base + chrono::Duration::days(1)),
    ];
    Collection::<TimelineEvent>::new(state.store.clone())
        .bulk_insert(&events)
        .await
        .unwrap();

    let (_, timeline) = send(&app, "GET", &format!("/api/candidates/{}/timeline", ben), None).await;
    let stages: Vec<&str> = timeline
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["stage"].as_str().unwrap())
        .collect();
    assert_eq!(stages, vec!["applied", "screen", "rejected"]);
}

#[tokio::test]
async fn missing_candidates_are_404() {
    let (app, _) = app().await;
    let id = Uuid::new_v4();

    for (method, uri, body) in [
        ("GET", format!("/api/candidates/{}", id), None),
        ("PATCH", format!("/api/candidates/{}", id), Some(json!({ "stage": "offer" }))),
        ("GET", format!("/api/candidates/{}/timeline", id), None),
    ] {
        let (code, body) = send(&app, method, &uri, body).await;
        assert_eq!(code, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn pipeline_counts_every_stage() {
    let (app, state) = app().await;
    insert_candidates(&state).await;

    let (code, counts) = send(&app, "GET", "/api/pipeline", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(
        counts,
        json!([
            { "stage": "applied", "count": 1 },
            { "stage": "screen", "count": 2 },
            { "stage": "tech", "count": 0 },
            { "stage": "offer", "count": 0 },
            { "stage": "hired", "count": 0 },
            { "stage": "rejected", "count": 1 }
        ])
    );
}
