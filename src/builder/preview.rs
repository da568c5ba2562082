use std::fmt::Write;

use crate::models::assessment::{Assessment, QuestionKind};

/// Plain-text outline of `assessment` as a candidate would see it.
pub fn render_preview(assessment: &Assessment) -> String {
    let mut out = String::new();
    if assessment.sections.is_empty() {
        out.push_str("(no sections yet)\n");
        return out;
    }

    let mut number = 0;
    for section in &assessment.sections {
        let _ = writeln!(out, "## {}", section.title);
        if section.questions.is_empty() {
            out.push_str("   (no questions)\n");
        }
        for question in &section.questions {
            number += 1;
            let marker = if question.is_required { " *" } else { "" };
            let _ = writeln!(out, "{}. {}{}", number, question.label, marker);
            match &question.kind {
                QuestionKind::ShortText { max_length } | QuestionKind::LongText { max_length } => {
                    let _ = write!(out, "   [{}]", question.kind.question_type());
                    if let Some(max) = max_length {
                        let _ = write!(out, " up to {} characters", max);
                    }
                    out.push('\n');
                }
                QuestionKind::SingleChoice { options } => {
                    for option in options {
                        let _ = writeln!(out, "   ( ) {}", option);
                    }
                }
                QuestionKind::MultiChoice { options } => {
                    for option in options {
                        let _ = writeln!(out, "   [ ] {}", option);
                    }
                }
                QuestionKind::Numeric { min, max } => {
                    let range = match (min, max) {
                        (Some(min), Some(max)) => format!(" between {} and {}", min, max),
                        (Some(min), None) => format!(" at least {}", min),
                        (None, Some(max)) => format!(" at most {}", max),
                        (None, None) => String::new(),
                    };
                    let _ = writeln!(out, "   [number{}]", range);
                }
                QuestionKind::FileUpload {} => out.push_str("   [file upload]\n"),
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AssessmentBuilder;
    use crate::models::assessment::QuestionType;
    use uuid::Uuid;

    #[test]
    fn numbers_questions_across_sections() {
        let mut builder = AssessmentBuilder::new(Uuid::new_v4());
        let first = builder.add_section("Basics");
        let second = builder.add_section("Skills");
        let name = builder.add_question(first, QuestionType::ShortText).unwrap();
        builder.rename_question(name, "Full name").unwrap();
        builder.toggle_required(name).unwrap();
        let years = builder.add_question(second, QuestionType::Numeric).unwrap();
        builder.rename_question(years, "Years of Rust").unwrap();
        builder.set_numeric_range(years, Some(0.0), Some(20.0)).unwrap();
        builder.add_question(second, QuestionType::SingleChoice).unwrap();

        let preview = render_preview(builder.document());
        assert!(preview.contains("## Basics\n1. Full name *\n   [short-text]\n"));
        assert!(preview.contains("2. Years of Rust\n   [number between 0 and 20]\n"));
        assert!(preview.contains("   ( ) Option 1\n   ( ) Option 2\n"));
    }
}
