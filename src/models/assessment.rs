use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::database::collection::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    ShortText,
    LongText,
    SingleChoice,
    MultiChoice,
    Numeric,
    FileUpload,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortText => "short-text",
            QuestionType::LongText => "long-text",
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultiChoice => "multi-choice",
            QuestionType::Numeric => "numeric",
            QuestionType::FileUpload => "file-upload",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific constraints, discriminated by the `type` field on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    ShortText {
        #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    LongText {
        #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    SingleChoice {
        #[serde(default)]
        options: Vec<String>,
    },
    MultiChoice {
        #[serde(default)]
        options: Vec<String>,
    },
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    FileUpload {},
}

impl QuestionKind {
    /// Constraints a freshly added question of `question_type` starts with.
    pub fn blank(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::ShortText => QuestionKind::ShortText { max_length: None },
            QuestionType::LongText => QuestionKind::LongText { max_length: None },
            QuestionType::SingleChoice => QuestionKind::SingleChoice {
                options: default_options(),
            },
            QuestionType::MultiChoice => QuestionKind::MultiChoice {
                options: default_options(),
            },
            QuestionType::Numeric => QuestionKind::Numeric {
                min: None,
                max: None,
            },
            QuestionType::FileUpload => QuestionKind::FileUpload {},
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::ShortText { .. } => QuestionType::ShortText,
            QuestionKind::LongText { .. } => QuestionType::LongText,
            QuestionKind::SingleChoice { .. } => QuestionType::SingleChoice,
            QuestionKind::MultiChoice { .. } => QuestionType::MultiChoice,
            QuestionKind::Numeric { .. } => QuestionType::Numeric,
            QuestionKind::FileUpload {} => QuestionType::FileUpload,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                Some(options)
            }
            _ => None,
        }
    }
}

fn default_options() -> Vec<String> {
    vec!["Option 1".to_string(), "Option 2".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// At most one per job; stored under its `jobId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub job_id: Uuid,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Assessment {
    pub fn empty(job_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            sections: Vec::new(),
        }
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|section| section.questions.iter())
    }
}

impl Record for Assessment {
    const COLLECTION: &'static str = "assessments";
}
