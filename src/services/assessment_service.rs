use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::builder::validation::validate_answers;
use crate::database::{Collection, DocumentStore};
use crate::dto::assessment_dto::SubmitAssessmentPayload;
use crate::error::{Error, Result};
use crate::models::assessment::Assessment;
use crate::models::response::AssessmentResponse;
use crate::utils::time;

#[derive(Clone)]
pub struct AssessmentService {
    assessments: Collection<Assessment>,
    responses: Collection<AssessmentResponse>,
}

impl AssessmentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            assessments: Collection::new(Arc::clone(&store)),
            responses: Collection::new(store),
        }
    }

    pub async fn get_by_job(&self, job_id: Uuid) -> Result<Assessment> {
        self.assessments
            .get(&job_id.to_string())
            .await?
            .ok_or_else(|| Error::NotFound(format!("No assessment for job {}", job_id)))
    }

    /// Stores `assessment` as the one assessment of `job_id`, replacing any
    /// previous version.
    pub async fn save(&self, job_id: Uuid, mut assessment: Assessment) -> Result<Assessment> {
        assessment.job_id = job_id;
        self.assessments.put(&assessment).await?;
        info!(
            job_id = %job_id,
            sections = assessment.sections.len(),
            questions = assessment.questions().count(),
            "Saved assessment"
        );
        Ok(assessment)
    }

    pub async fn submit(
        &self,
        job_id: Uuid,
        payload: SubmitAssessmentPayload,
    ) -> Result<AssessmentResponse> {
        let assessment = self.get_by_job(job_id).await?;

        if let Err(errors) = validate_answers(&assessment, &payload.answers) {
            warn!(job_id = %job_id, candidate_id = %payload.candidate_id, %errors, "Rejected assessment submission");
            return Err(Error::BadRequest(errors.to_string()));
        }

        let response = AssessmentResponse {
            id: Uuid::new_v4(),
            assessment_id: assessment.id,
            job_id,
            candidate_id: payload.candidate_id,
            answers: payload.answers,
            submitted_at: time::now(),
        };
        self.responses.insert(&response).await?;
        info!(job_id = %job_id, response_id = %response.id, "Stored assessment response");
        Ok(response)
    }
}
