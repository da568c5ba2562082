pub mod assessments;
pub mod candidates;
pub mod health;
pub mod jobs;
pub mod seed;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::middleware::latency::{fault_middleware, latency_middleware};
use crate::AppState;

/// The mock API. Everything under `/api` goes through the simulated network;
/// job reorders may additionally fail.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/seed", post(seed::seed))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/:id", get(jobs::get_job).patch(jobs::update_job))
        .route("/api/candidates", get(candidates::list_candidates))
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate).patch(candidates::update_candidate),
        )
        .route(
            "/api/candidates/:id/timeline",
            get(candidates::get_timeline).post(candidates::add_note),
        )
        .route("/api/pipeline", get(candidates::pipeline_summary))
        .route(
            "/api/assessments/:job_id",
            get(assessments::get_assessment).put(assessments::save_assessment),
        )
        .route(
            "/api/assessments/:job_id/submit",
            post(assessments::submit_assessment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.simulator.clone(),
            latency_middleware,
        ));

    let faulty = Router::new()
        .route("/api/jobs/:id/reorder", patch(jobs::reorder_job))
        .layer(axum::middleware::from_fn_with_state(
            state.simulator.clone(),
            fault_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .merge(faulty)
        .with_state(state)
}
