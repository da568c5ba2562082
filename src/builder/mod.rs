//! Working copy of an assessment while it is being edited.
//!
//! Every operation rewrites only the addressed section, question or option;
//! siblings are left as they were. Unknown ids are reported, never ignored.

pub mod preview;
pub mod validation;

use uuid::Uuid;

use crate::models::assessment::{Assessment, Question, QuestionKind, QuestionType, Section};

pub use preview::render_preview;
pub use validation::{validate_answers, FieldErrors, ValidationRule, ValidationSchema};

pub const NEW_SECTION_TITLE: &str = "New section";
pub const NEW_QUESTION_LABEL: &str = "Untitled question";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuilderError {
    #[error("Section {0} not found")]
    SectionNotFound(Uuid),

    #[error("Question {0} not found")]
    QuestionNotFound(Uuid),

    #[error("Question {question} has no option #{index}")]
    OptionNotFound { question: Uuid, index: usize },

    #[error("Question {question} is {actual}, expected {expected}")]
    WrongQuestionType {
        question: Uuid,
        expected: &'static str,
        actual: QuestionType,
    },

    #[error("Question {0} must keep at least one option")]
    LastOption(Uuid),

    #[error("Question {question}: minimum {min} exceeds maximum {max}")]
    InvalidRange { question: Uuid, min: f64, max: f64 },

    #[error("Add at least one question before saving the assessment")]
    EmptyAssessment,
}

pub type BuilderResult<T> = std::result::Result<T, BuilderError>;

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentBuilder {
    document: Assessment,
}

impl AssessmentBuilder {
    pub fn new(job_id: Uuid) -> Self {
        Self::load(Assessment::empty(job_id))
    }

    pub fn load(document: Assessment) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Assessment {
        &self.document
    }

    pub fn into_document(self) -> Assessment {
        self.document
    }

    pub fn add_section(&mut self, title: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.document.sections.push(Section {
            id,
            title: title.into(),
            questions: Vec::new(),
        });
        id
    }

    /// Removes the section together with its questions.
    pub fn remove_section(&mut self, section_id: Uuid) -> BuilderResult<Section> {
        let index = self
            .document
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or(BuilderError::SectionNotFound(section_id))?;
        Ok(self.document.sections.remove(index))
    }

    pub fn rename_section(&mut self, section_id: Uuid, title: impl Into<String>) -> BuilderResult<()> {
        self.section_mut(section_id)?.title = title.into();
        Ok(())
    }

    pub fn add_question(
        &mut self,
        section_id: Uuid,
        question_type: QuestionType,
    ) -> BuilderResult<Uuid> {
        let section = self.section_mut(section_id)?;
        let id = Uuid::new_v4();
        section.questions.push(Question {
            id,
            label: NEW_QUESTION_LABEL.to_string(),
            is_required: false,
            kind: QuestionKind::blank(question_type),
        });
        Ok(id)
    }

    pub fn remove_question(&mut self, question_id: Uuid) -> BuilderResult<Question> {
        for section in &mut self.document.sections {
            if let Some(index) = section.questions.iter().position(|q| q.id == question_id) {
                return Ok(section.questions.remove(index));
            }
        }
        Err(BuilderError::QuestionNotFound(question_id))
    }

    pub fn rename_question(
        &mut self,
        question_id: Uuid,
        label: impl Into<String>,
    ) -> BuilderResult<()> {
        self.question_mut(question_id)?.label = label.into();
        Ok(())
    }

    /// Returns the new value of the flag.
    pub fn toggle_required(&mut self, question_id: Uuid) -> BuilderResult<bool> {
        let question = self.question_mut(question_id)?;
        question.is_required = !question.is_required;
        Ok(question.is_required)
    }

    /// Appends an option and returns its index.
    pub fn add_option(&mut self, question_id: Uuid, option: impl Into<String>) -> BuilderResult<usize> {
        let options = self.options_mut(question_id)?;
        options.push(option.into());
        Ok(options.len() - 1)
    }

    pub fn update_option(
        &mut self,
        question_id: Uuid,
        index: usize,
        option: impl Into<String>,
    ) -> BuilderResult<()> {
        let slot = self
            .options_mut(question_id)?
            .get_mut(index)
            .ok_or(BuilderError::OptionNotFound {
                question: question_id,
                index,
            })?;
        *slot = option.into();
        Ok(())
    }

    pub fn remove_option(&mut self, question_id: Uuid, index: usize) -> BuilderResult<String> {
        let options = self.options_mut(question_id)?;
        if index >= options.len() {
            return Err(BuilderError::OptionNotFound {
                question: question_id,
                index,
            });
        }
        if options.len() == 1 {
            return Err(BuilderError::LastOption(question_id));
        }
        Ok(options.remove(index))
    }

    pub fn set_numeric_range(
        &mut self,
        question_id: Uuid,
        min: Option<f64>,
        max: Option<f64>,
    ) -> BuilderResult<()> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(BuilderError::InvalidRange {
                    question: question_id,
                    min: lo,
                    max: hi,
                });
            }
        }
        let question = self.question_mut(question_id)?;
        match &mut question.kind {
            QuestionKind::Numeric {
                min: current_min,
                max: current_max,
            } => {
                *current_min = min;
                *current_max = max;
                Ok(())
            }
            other => Err(BuilderError::WrongQuestionType {
                question: question_id,
                expected: "numeric",
                actual: other.question_type(),
            }),
        }
    }

    pub fn set_max_length(&mut self, question_id: Uuid, max_length: Option<usize>) -> BuilderResult<()> {
        let question = self.question_mut(question_id)?;
        match &mut question.kind {
            QuestionKind::ShortText { max_length: current }
            | QuestionKind::LongText { max_length: current } => {
                *current = max_length;
                Ok(())
            }
            other => Err(BuilderError::WrongQuestionType {
                question: question_id,
                expected: "short-text or long-text",
                actual: other.question_type(),
            }),
        }
    }

    /// The document to persist, or the reason it must not be saved.
    pub fn prepare_save(&self) -> BuilderResult<Assessment> {
        validate_document(&self.document)?;
        Ok(self.document.clone())
    }

    fn section_mut(&mut self, section_id: Uuid) -> BuilderResult<&mut Section> {
        self.document
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or(BuilderError::SectionNotFound(section_id))
    }

    fn question_mut(&mut self, question_id: Uuid) -> BuilderResult<&mut Question> {
        self.document
            .sections
            .iter_mut()
            .flat_map(|s| s.questions.iter_mut())
            .find(|q| q.id == question_id)
            .ok_or(BuilderError::QuestionNotFound(question_id))
    }

    fn options_mut(&mut self, question_id: Uuid) -> BuilderResult<&mut Vec<String>> {
        let question = self.question_mut(question_id)?;
        match &mut question.kind {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                Ok(options)
            }
            other => Err(BuilderError::WrongQuestionType {
                question: question_id,
                expected: "single-choice or multi-choice",
                actual: other.question_type(),
            }),
        }
    }
}

/// Structural checks a document must pass before it is stored: at least one
/// question overall, choice questions with options, and ordered ranges.
pub fn validate_document(assessment: &Assessment) -> BuilderResult<()> {
    if assessment.questions().next().is_none() {
        return Err(BuilderError::EmptyAssessment);
    }
    for question in assessment.questions() {
        match &question.kind {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options }
                if options.is_empty() =>
            {
                return Err(BuilderError::LastOption(question.id));
            }
            QuestionKind::Numeric {
                min: Some(min),
                max: Some(max),
            } if min > max => {
                return Err(BuilderError::InvalidRange {
                    question: question.id,
                    min: *min,
                    max: *max,
                });
            }
            _ => {}
        }
    }
    Ok(())
}
