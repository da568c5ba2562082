use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::response::Answers;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentPayload {
    pub candidate_id: Uuid,
    #[serde(default)]
    pub answers: Answers,
}
