//! Answer rules for the candidate-facing form.
//!
//! Each question variant maps to exactly one [`ValidationRule`]; the same
//! rules run in the client before submitting and on the server when a
//! response is stored.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::assessment::{Assessment, Question, QuestionKind};
use crate::models::response::Answers;

pub const REQUIRED: &str = "This field is required";

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    Text {
        required: bool,
        max_length: Option<usize>,
    },
    SingleChoice {
        required: bool,
        options: Vec<String>,
    },
    MultiChoice {
        required: bool,
        options: Vec<String>,
    },
    Numeric {
        required: bool,
        min: Option<f64>,
        max: Option<f64>,
    },
    File {
        required: bool,
    },
}

impl ValidationRule {
    pub fn for_question(question: &Question) -> Self {
        let required = question.is_required;
        match &question.kind {
            QuestionKind::ShortText { max_length } | QuestionKind::LongText { max_length } => {
                ValidationRule::Text {
                    required,
                    max_length: *max_length,
                }
            }
            QuestionKind::SingleChoice { options } => ValidationRule::SingleChoice {
                required,
                options: options.clone(),
            },
            QuestionKind::MultiChoice { options } => ValidationRule::MultiChoice {
                required,
                options: options.clone(),
            },
            QuestionKind::Numeric { min, max } => ValidationRule::Numeric {
                required,
                min: *min,
                max: *max,
            },
            QuestionKind::FileUpload {} => ValidationRule::File { required },
        }
    }

    fn required(&self) -> bool {
        match self {
            ValidationRule::Text { required, .. }
            | ValidationRule::SingleChoice { required, .. }
            | ValidationRule::MultiChoice { required, .. }
            | ValidationRule::Numeric { required, .. }
            | ValidationRule::File { required } => *required,
        }
    }

    /// Checks one answer; `None` means the question was left unanswered.
    pub fn check(&self, answer: Option<&JsonValue>) -> Result<(), String> {
        let Some(answer) = answer.filter(|value| !is_blank(value)) else {
            return if self.required() {
                Err(REQUIRED.to_string())
            } else {
                Ok(())
            };
        };

        match self {
            ValidationRule::Text { max_length, .. } => {
                let text = answer.as_str().ok_or("Expected a text answer")?;
                match max_length {
                    Some(max) if text.chars().count() > *max => {
                        Err(format!("Must be at most {} characters", max))
                    }
                    _ => Ok(()),
                }
            }
            ValidationRule::SingleChoice { options, .. } => {
                let choice = answer.as_str().ok_or("Expected a single choice")?;
                if options.iter().any(|option| option == choice) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not one of the options", choice))
                }
            }
            ValidationRule::MultiChoice { options, .. } => {
                let choices = answer.as_array().ok_or("Expected a list of choices")?;
                for choice in choices {
                    let choice = choice.as_str().ok_or("Expected a list of choices")?;
                    if !options.iter().any(|option| option == choice) {
                        return Err(format!("'{}' is not one of the options", choice));
                    }
                }
                Ok(())
            }
            ValidationRule::Numeric { min, max, .. } => {
                let number = as_number(answer).ok_or("Expected a number")?;
                if let Some(min) = min.filter(|min| number < *min) {
                    return Err(format!("Must be at least {}", min));
                }
                if let Some(max) = max.filter(|max| number > *max) {
                    return Err(format!("Must be at most {}", max));
                }
                Ok(())
            }
            ValidationRule::File { .. } => answer
                .as_str()
                .map(|_| ())
                .ok_or_else(|| "Expected a file reference".to_string()),
        }
    }
}

fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Form inputs may hand numbers over as strings.
fn as_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Per-question messages, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Uuid, String>);

impl FieldErrors {
    pub fn get(&self, question_id: &Uuid) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &String)> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid answer(s)", self.0.len())?;
        for (id, message) in &self.0 {
            write!(f, "; {}: {}", id, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Rules for every question of one assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSchema {
    rules: Vec<(Uuid, ValidationRule)>,
}

impl ValidationSchema {
    pub fn for_assessment(assessment: &Assessment) -> Self {
        Self {
            rules: assessment
                .questions()
                .map(|question| (question.id, ValidationRule::for_question(question)))
                .collect(),
        }
    }

    /// Answers to unknown questions are ignored.
    pub fn validate(&self, answers: &Answers) -> Result<(), FieldErrors> {
        let errors: BTreeMap<Uuid, String> = self
            .rules
            .iter()
            .filter_map(|(id, rule)| rule.check(answers.get(id)).err().map(|e| (*id, e)))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(errors))
        }
    }
}

pub fn validate_answers(assessment: &Assessment, answers: &Answers) -> Result<(), FieldErrors> {
    ValidationSchema::for_assessment(assessment).validate(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::Section;
    use serde_json::json;

    fn question(label: &str, is_required: bool, kind: QuestionKind) -> Question {
        Question {
            id: Uuid::new_v4(),
            label: label.to_string(),
            is_required,
            kind,
        }
    }

    #[test]
    fn required_text_rejects_blank_answers() {
        let rule = ValidationRule::for_question(&question(
            "Name",
            true,
            QuestionKind::ShortText { max_length: Some(5) },
        ));
        assert_eq!(rule.check(None), Err(REQUIRED.to_string()));
        assert_eq!(rule.check(Some(&json!("   "))), Err(REQUIRED.to_string()));
        assert!(rule.check(Some(&json!("Ada"))).is_ok());
        assert!(rule.check(Some(&json!("Ada Lovelace"))).is_err());
    }

    #[test]
    fn optional_questions_accept_no_answer() {
        let rule = ValidationRule::for_question(&question(
            "Portfolio",
            false,
            QuestionKind::FileUpload {},
        ));
        assert!(rule.check(None).is_ok());
        assert!(rule.check(Some(&json!(null))).is_ok());
        assert!(rule.check(Some(&json!(42))).is_err());
    }

    #[test]
    fn choices_must_come_from_the_options() {
        let options = vec!["Yes".to_string(), "No".to_string()];
        let single = ValidationRule::for_question(&question(
            "Relocate?",
            true,
            QuestionKind::SingleChoice {
                options: options.clone(),
            },
        ));
        assert!(single.check(Some(&json!("Yes"))).is_ok());
        assert!(single.check(Some(&json!("Maybe"))).is_err());

        let multi = ValidationRule::for_question(&question(
            "Stack",
            true,
            QuestionKind::MultiChoice { options },
        ));
        assert!(multi.check(Some(&json!(["Yes", "No"]))).is_ok());
        assert_eq!(multi.check(Some(&json!([]))), Err(REQUIRED.to_string()));
        assert!(multi.check(Some(&json!(["Yes", "Other"]))).is_err());
    }

    #[test]
    fn numeric_answers_respect_the_range() {
        let rule = ValidationRule::for_question(&question(
            "Years",
            true,
            QuestionKind::Numeric {
                min: Some(0.0),
                max: Some(50.0),
            },
        ));
        assert!(rule.check(Some(&json!(7))).is_ok());
        assert!(rule.check(Some(&json!("12"))).is_ok());
        assert!(rule.check(Some(&json!(-1))).is_err());
        assert!(rule.check(Some(&json!(51.5))).is_err());
        assert!(rule.check(Some(&json!("seven"))).is_err());
    }

    #[test]
    fn schema_collects_errors_per_question() {
        let name = question("Name", true, QuestionKind::ShortText { max_length: None });
        let years = question(
            "Years",
            false,
            QuestionKind::Numeric {
                min: Some(1.0),
                max: None,
            },
        );
        let assessment = Assessment {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            sections: vec![Section {
                id: Uuid::new_v4(),
                title: "Basics".into(),
                questions: vec![name.clone(), years.clone()],
            }],
        };

        let mut answers = Answers::new();
        answers.insert(years.id, json!(0));
        let errors = validate_answers(&assessment, &answers).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(&name.id), Some(REQUIRED));

        answers.insert(name.id, json!("Grace"));
        answers.insert(years.id, json!(3));
        assert!(validate_answers(&assessment, &answers).is_ok());
    }
}
