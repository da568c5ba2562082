use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::candidate_dto::{AddNotePayload, CandidateListQuery, UpdateCandidatePayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("stage" = Option<String>, Query, description = "Exact pipeline stage"),
        ("jobId" = Option<Uuid>, Query, description = "Only candidates of this job"),
        ("search" = Option<String>, Query, description = "Case-insensitive name or email substring")
    ),
    responses(
        (status = 200, description = "Matching candidates ordered by name", body = [crate::models::candidate::Candidate])
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.list(query).await?;
    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Candidate found", body = Json<crate::models::candidate::Candidate>),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get(id).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    request_body = UpdateCandidatePayload,
    responses(
        (status = 200, description = "Candidate updated", body = Json<crate::models::candidate::Candidate>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.update(id, payload).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/timeline",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Events oldest first", body = [crate::models::timeline::TimelineEvent]),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let events = state.candidate_service.timeline(id).await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/timeline",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    request_body = AddNotePayload,
    responses(
        (status = 201, description = "Note appended", body = Json<crate::models::timeline::TimelineEvent>),
        (status = 400, description = "Empty note"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddNotePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.candidate_service.add_note(id, payload.notes).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/pipeline",
    responses(
        (status = 200, description = "Candidate count per stage")
    )
)]
#[axum::debug_handler]
pub async fn pipeline_summary(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let counts = state.candidate_service.pipeline_summary().await?;
    Ok(Json(counts))
}
