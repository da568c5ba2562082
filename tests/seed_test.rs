mod common;

use std::collections::HashMap;

use axum::http::StatusCode;
use talentflow_backend::database::{Collection, Query, SortOrder};
use talentflow_backend::models::{Candidate, CandidateStage, Job, TimelineEvent};
use tokio_test::assert_ok;

use common::{app, send};

#[tokio::test]
async fn seeding_twice_does_not_duplicate() {
    let (app, state) = app().await;

    let (code, body) = send(&app, "POST", "/api/seed", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["success"], true);
    let report = assert_ok!(state.seed_service.seed().await);
    assert!(report.skipped);

    let jobs = Collection::<Job>::new(state.store.clone());
    let candidates = Collection::<Candidate>::new(state.store.clone());
    assert_eq!(jobs.count(&Query::new()).await.unwrap(), 12);
    assert_eq!(candidates.count(&Query::new()).await.unwrap(), 40);

    let orders: Vec<i64> = jobs
        .find(&Query::new().order_by("order", SortOrder::Asc))
        .await
        .unwrap()
        .iter()
        .map(|job| job.order)
        .collect();
    assert_eq!(orders, (0..12).collect::<Vec<_>>());
}

#[tokio::test]
async fn seeded_timelines_match_candidate_stages() {
    let (_, state) = app().await;
    assert_ok!(state.seed_service.seed().await);

    let candidates = Collection::<Candidate>::new(state.store.clone())
        .find(&Query::new())
        .await
        .unwrap();
    let events = Collection::<TimelineEvent>::new(state.store.clone())
        .find(&Query::new().order_by("date", SortOrder::Asc))
        .await
        .unwrap();

    let mut by_candidate: HashMap<_, Vec<&TimelineEvent>> = HashMap::new();
    for event in &events {
        by_candidate.entry(event.candidate_id).or_default().push(event);
    }

    for candidate in &candidates {
        let timeline = &by_candidate[&candidate.id];
        assert!(timeline.windows(2).all(|pair| pair[0].date < pair[1].date));
        let stages: Vec<_> = timeline.iter().filter_map(|event| event.stage()).collect();
        assert_eq!(stages.last(), Some(&candidate.stage));

        match candidate.stage {
            CandidateStage::Hired => assert_eq!(stages, CandidateStage::PIPELINE.to_vec()),
            CandidateStage::Rejected => {
                let prefix = &stages[..stages.len() - 1];
                assert!(!prefix.is_empty());
                assert!(prefix.iter().all(|stage| matches!(
                    stage,
                    CandidateStage::Applied | CandidateStage::Screen | CandidateStage::Tech
                )));
            }
            _ => assert_eq!(stages[0], CandidateStage::Applied),
        }
    }
}
