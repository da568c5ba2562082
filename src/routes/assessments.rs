use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::assessment_dto::SubmitAssessmentPayload,
    error::Result,
    models::assessment::Assessment,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/assessments/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Saved assessment", body = Json<Assessment>),
        (status = 404, description = "No assessment saved for this job")
    )
)]
#[axum::debug_handler]
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assessment = state.assessment_service.get_by_job(job_id).await?;
    Ok(Json(assessment))
}

/// Full replace. The job in the path wins over any `jobId` in the body.
#[utoipa::path(
    put,
    path = "/api/assessments/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    request_body = Assessment,
    responses(
        (status = 200, description = "Assessment stored", body = Json<Assessment>)
    )
)]
#[axum::debug_handler]
pub async fn save_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(assessment): Json<Assessment>,
) -> Result<impl IntoResponse> {
    let saved = state.assessment_service.save(job_id, assessment).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    post,
    path = "/api/assessments/{job_id}/submit",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    request_body = SubmitAssessmentPayload,
    responses(
        (status = 201, description = "Response stored", body = Json<crate::models::response::AssessmentResponse>),
        (status = 400, description = "Answers fail the assessment's rules"),
        (status = 404, description = "No assessment saved for this job")
    )
)]
#[axum::debug_handler]
pub async fn submit_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<SubmitAssessmentPayload>,
) -> Result<impl IntoResponse> {
    let response = state.assessment_service.submit(job_id, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
