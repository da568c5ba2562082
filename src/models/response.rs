use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::database::collection::Record;

pub type Answers = BTreeMap<Uuid, JsonValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub answers: Answers,
    #[serde(with = "crate::utils::time::millis")]
    pub submitted_at: DateTime<Utc>,
}

impl Record for AssessmentResponse {
    const COLLECTION: &'static str = "assessment_responses";
}
