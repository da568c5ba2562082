use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::client::{ApiError, ApiResult, TalentApi};
use crate::dto::assessment_dto::SubmitAssessmentPayload;
use crate::dto::candidate_dto::{
    AddNotePayload, CandidateListQuery, StageCount, UpdateCandidatePayload,
};
use crate::dto::job_dto::{
    CreateJobPayload, JobListQuery, JobListResponse, ReorderJobPayload, UpdateJobPayload,
};
use crate::dto::{ErrorResponse, SuccessResponse};
use crate::models::{Assessment, AssessmentResponse, Candidate, Job, TimelineEvent};

/// [`TalentApi`] over HTTP, against a server exposing the routes under `/api`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "API response");

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        // Injected faults come back with an empty body.
        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .map(|envelope| envelope.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());

        if status == StatusCode::NOT_FOUND {
            Err(ApiError::NotFound(message))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl TalentApi for ApiClient {
    async fn get_jobs(&self, query: JobListQuery) -> ApiResult<JobListResponse> {
        self.send(self.http.get(self.url("/jobs")).query(&query))
            .await
    }

    async fn create_job(&self, payload: CreateJobPayload) -> ApiResult<Job> {
        self.send(self.http.post(self.url("/jobs")).json(&payload))
            .await
    }

    async fn update_job(&self, id: Uuid, payload: UpdateJobPayload) -> ApiResult<Job> {
        self.send(
            self.http
                .patch(self.url(&format!("/jobs/{}", id)))
                .json(&payload),
        )
        .await
    }

    async fn reorder_job(&self, id: Uuid, to_order: Option<i64>) -> ApiResult<SuccessResponse> {
        self.send(
            self.http
                .patch(self.url(&format!("/jobs/{}/reorder", id)))
                .json(&ReorderJobPayload { to_order }),
        )
        .await
    }

    async fn get_job_by_id(&self, id: Uuid) -> ApiResult<Job> {
        self.send(self.http.get(self.url(&format!("/jobs/{}", id))))
            .await
    }

    async fn get_candidates(&self, query: CandidateListQuery) -> ApiResult<Vec<Candidate>> {
        self.send(self.http.get(self.url("/candidates")).query(&query))
            .await
    }

    async fn update_candidate(
        &self,
        id: Uuid,
        payload: UpdateCandidatePayload,
    ) -> ApiResult<Candidate> {
        self.send(
            self.http
                .patch(self.url(&format!("/candidates/{}", id)))
                .json(&payload),
        )
        .await
    }

    async fn get_candidate_by_id(&self, id: Uuid) -> ApiResult<Candidate> {
        self.send(self.http.get(self.url(&format!("/candidates/{}", id))))
            .await
    }

    async fn get_candidate_timeline(&self, id: Uuid) -> ApiResult<Vec<TimelineEvent>> {
        self.send(
            self.http
                .get(self.url(&format!("/candidates/{}/timeline", id))),
        )
        .await
    }

    async fn add_timeline_note(&self, id: Uuid, notes: String) -> ApiResult<TimelineEvent> {
        self.send(
            self.http
                .post(self.url(&format!("/candidates/{}/timeline", id)))
                .json(&AddNotePayload { notes }),
        )
        .await
    }

    async fn get_pipeline(&self) -> ApiResult<Vec<StageCount>> {
        self.send(self.http.get(self.url("/pipeline"))).await
    }

    async fn get_assessment_by_job_id(&self, job_id: Uuid) -> ApiResult<Assessment> {
        self.send(self.http.get(self.url(&format!("/assessments/{}", job_id))))
            .await
    }

    async fn save_assessment(
        &self,
        job_id: Uuid,
        assessment: Assessment,
    ) -> ApiResult<Assessment> {
        self.send(
            self.http
                .put(self.url(&format!("/assessments/{}", job_id)))
                .json(&assessment),
        )
        .await
    }

    async fn submit_assessment(
        &self,
        job_id: Uuid,
        payload: SubmitAssessmentPayload,
    ) -> ApiResult<AssessmentResponse> {
        self.send(
            self.http
                .post(self.url(&format!("/assessments/{}/submit", job_id)))
                .json(&payload),
        )
        .await
    }

    async fn seed(&self) -> ApiResult<SuccessResponse> {
        self.send(self.http.post(self.url("/seed")).json(&json!({})))
            .await
    }
}
