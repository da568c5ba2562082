use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::builder::{AssessmentBuilder, BuilderError, FieldErrors, ValidationSchema};
use crate::client::TalentApi;
use crate::dto::assessment_dto::SubmitAssessmentPayload;
use crate::models::assessment::Assessment;
use crate::models::response::{Answers, AssessmentResponse};
use crate::sync::{MutationError, Notices};

/// Builder screen for the assessment of one job.
pub struct BuilderSession<A> {
    api: A,
    job_id: Uuid,
    builder: AssessmentBuilder,
    pub notices: Notices,
}

impl<A: TalentApi> BuilderSession<A> {
    /// Starts from the saved assessment, or from an empty one when the job
    /// has none yet.
    pub async fn open(api: A, job_id: Uuid) -> Result<Self, MutationError> {
        let builder = match api.get_assessment_by_job_id(job_id).await {
            Ok(existing) => AssessmentBuilder::load(existing),
            Err(err) if err.is_not_found() => AssessmentBuilder::new(job_id),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            api,
            job_id,
            builder,
            notices: Notices::default(),
        })
    }

    pub fn builder(&self) -> &AssessmentBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut AssessmentBuilder {
        &mut self.builder
    }

    /// Persists the working copy. Documents that fail the structural checks
    /// never leave the client.
    pub async fn save(&mut self) -> Result<Assessment, MutationError> {
        let document = match self.builder.prepare_save() {
            Ok(document) => document,
            Err(err) => {
                let message = match &err {
                    BuilderError::EmptyAssessment => {
                        "Add at least one question before saving".to_string()
                    }
                    other => other.to_string(),
                };
                self.notices.warning(message);
                return Err(err.into());
            }
        };

        match self.api.save_assessment(self.job_id, document).await {
            Ok(saved) => {
                self.notices.success("Assessment saved");
                Ok(saved)
            }
            Err(err) => {
                warn!(job_id = %self.job_id, error = %err, "Saving assessment failed");
                self.notices
                    .error(format!("Could not save assessment: {}", err));
                Err(err.into())
            }
        }
    }
}

/// Candidate-facing answer form for a saved assessment.
#[derive(Debug, Clone)]
pub struct RuntimeForm {
    assessment: Assessment,
    schema: ValidationSchema,
    answers: Answers,
    errors: FieldErrors,
}

impl RuntimeForm {
    pub fn new(assessment: Assessment) -> Self {
        Self {
            schema: ValidationSchema::for_assessment(&assessment),
            assessment,
            answers: Answers::new(),
            errors: FieldErrors::default(),
        }
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn set_answer(&mut self, question_id: Uuid, value: JsonValue) {
        self.answers.insert(question_id, value);
    }

    pub fn clear_answer(&mut self, question_id: Uuid) {
        self.answers.remove(&question_id);
    }

    /// Errors from the last [`RuntimeForm::validate`].
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> Result<(), FieldErrors> {
        match self.schema.validate(&self.answers) {
            Ok(()) => {
                self.errors = FieldErrors::default();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    pub async fn submit<A: TalentApi>(
        &mut self,
        api: &A,
        candidate_id: Uuid,
    ) -> Result<AssessmentResponse, MutationError> {
        self.validate()?;
        let payload = SubmitAssessmentPayload {
            candidate_id,
            answers: self.answers.clone(),
        };
        let response = api
            .submit_assessment(self.assessment.job_id, payload)
            .await?;
        debug!(response_id = %response.id, "Submitted assessment");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiError, MockTalentApi};
    use crate::models::assessment::QuestionType;
    use crate::sync::NoticeLevel;
    use serde_json::json;

    #[tokio::test]
    async fn empty_assessment_never_reaches_the_api() {
        let job_id = Uuid::new_v4();
        let mut api = MockTalentApi::new();
        api.expect_get_assessment_by_job_id()
            .returning(|_| Err(ApiError::NotFound("No assessment".into())));
        api.expect_save_assessment().never();

        let mut session = BuilderSession::open(api, job_id).await.unwrap();
        session.builder_mut().add_section("Intro");

        let err = session.save().await.unwrap_err();
        assert!(matches!(err, MutationError::Builder(BuilderError::EmptyAssessment)));
        assert_eq!(session.notices.last().unwrap().level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn saves_documents_with_questions() {
        let job_id = Uuid::new_v4();
        let mut api = MockTalentApi::new();
        api.expect_get_assessment_by_job_id()
            .returning(|_| Err(ApiError::NotFound("No assessment".into())));
        api.expect_save_assessment()
            .withf(move |id, doc| *id == job_id && doc.questions().count() == 1)
            .times(1)
            .returning(|_, doc| Ok(doc));

        let mut session = BuilderSession::open(api, job_id).await.unwrap();
        let section = session.builder_mut().add_section("Intro");
        session
            .builder_mut()
            .add_question(section, QuestionType::ShortText)
            .unwrap();

        let saved = session.save().await.unwrap();
        assert_eq!(&saved, session.builder().document());
    }

    #[tokio::test]
    async fn invalid_answers_are_not_submitted() {
        let mut builder = AssessmentBuilder::new(Uuid::new_v4());
        let section = builder.add_section("Basics");
        let name = builder.add_question(section, QuestionType::ShortText).unwrap();
        builder.toggle_required(name).unwrap();

        let mut api = MockTalentApi::new();
        api.expect_submit_assessment().never();

        let mut form = RuntimeForm::new(builder.into_document());
        let err = form.submit(&api, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, MutationError::InvalidAnswers(_)));
        assert!(form.errors().get(&name).is_some());

        form.set_answer(name, json!("Ada"));
        assert!(form.validate().is_ok());
        assert!(form.errors().is_empty());
    }
}
