use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        job_dto::{
            CreateJobPayload, JobListQuery, JobListResponse, ReorderJobPayload, UpdateJobPayload,
        },
        SuccessResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "1-based page, defaults to 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, defaults to 10"),
        ("status" = Option<String>, Query, description = "active or archived"),
        ("search" = Option<String>, Query, description = "Case-insensitive title substring")
    ),
    responses(
        (status = 200, description = "One page of jobs sorted by order", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.job_service.list(query).await?;
    Ok(Json(JobListResponse::from(list)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created at the end of the ordering", body = Json<crate::models::job::Job>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = Json<crate::models::job::Job>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Json<crate::models::job::Job>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, payload).await?;
    Ok(Json(job))
}

/// Served behind `fault_middleware`: a share of calls waits the failure delay
/// and answers 500 with an empty body, leaving the ordering untouched.
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/reorder",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = ReorderJobPayload,
    responses(
        (status = 200, description = "Job moved to the target position", body = Json<SuccessResponse>),
        (status = 404, description = "Job not found"),
        (status = 500, description = "Injected failure")
    )
)]
#[axum::debug_handler]
pub async fn reorder_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.job_service.reorder(id, payload.to_order).await?;
    Ok(Json(SuccessResponse::ok()))
}
