pub mod assessment;
pub mod candidate;
pub mod job;
pub mod response;
pub mod timeline;

pub use assessment::{Assessment, Question, QuestionKind, QuestionType, Section};
pub use candidate::{Candidate, CandidateStage};
pub use job::{Job, JobStatus};
pub use response::{Answers, AssessmentResponse};
pub use timeline::{TimelineEntry, TimelineEvent};
