//! Typed access to the mock API, the only surface the UI-side flows use.

pub mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::assessment_dto::SubmitAssessmentPayload;
use crate::dto::candidate_dto::{CandidateListQuery, StageCount, UpdateCandidatePayload};
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, JobListResponse, UpdateJobPayload};
use crate::dto::SuccessResponse;
use crate::models::{Assessment, AssessmentResponse, Candidate, Job, TimelineEvent};

pub use http::ApiClient;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TalentApi: Send + Sync {
    async fn get_jobs(&self, query: JobListQuery) -> ApiResult<JobListResponse>;

    async fn create_job(&self, payload: CreateJobPayload) -> ApiResult<Job>;

    async fn update_job(&self, id: Uuid, payload: UpdateJobPayload) -> ApiResult<Job>;

    /// Moves the job to the global position `to_order`.
    async fn reorder_job(&self, id: Uuid, to_order: Option<i64>) -> ApiResult<SuccessResponse>;

    async fn get_job_by_id(&self, id: Uuid) -> ApiResult<Job>;

    async fn get_candidates(&self, query: CandidateListQuery) -> ApiResult<Vec<Candidate>>;

    async fn update_candidate(
        &self,
        id: Uuid,
        payload: UpdateCandidatePayload,
    ) -> ApiResult<Candidate>;

    async fn get_candidate_by_id(&self, id: Uuid) -> ApiResult<Candidate>;

    async fn get_candidate_timeline(&self, id: Uuid) -> ApiResult<Vec<TimelineEvent>>;

    async fn add_timeline_note(&self, id: Uuid, notes: String) -> ApiResult<TimelineEvent>;

    async fn get_pipeline(&self) -> ApiResult<Vec<StageCount>>;

    async fn get_assessment_by_job_id(&self, job_id: Uuid) -> ApiResult<Assessment>;

    async fn save_assessment(&self, job_id: Uuid, assessment: Assessment)
        -> ApiResult<Assessment>;

    async fn submit_assessment(
        &self,
        job_id: Uuid,
        payload: SubmitAssessmentPayload,
    ) -> ApiResult<AssessmentResponse>;

    async fn seed(&self) -> ApiResult<SuccessResponse>;
}
