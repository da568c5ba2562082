use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::collection::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl CandidateStage {
    /// Board columns, left to right.
    pub const ALL: [CandidateStage; 6] = [
        CandidateStage::Applied,
        CandidateStage::Screen,
        CandidateStage::Tech,
        CandidateStage::Offer,
        CandidateStage::Hired,
        CandidateStage::Rejected,
    ];

    /// The forward path a successful candidate walks through.
    pub const PIPELINE: [CandidateStage; 5] = [
        CandidateStage::Applied,
        CandidateStage::Screen,
        CandidateStage::Tech,
        CandidateStage::Offer,
        CandidateStage::Hired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStage::Applied => "applied",
            CandidateStage::Screen => "screen",
            CandidateStage::Tech => "tech",
            CandidateStage::Offer => "offer",
            CandidateStage::Hired => "hired",
            CandidateStage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CandidateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown candidate stage: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub job_id: Uuid,
    pub stage: CandidateStage,
}

impl Record for Candidate {
    const COLLECTION: &'static str = "candidates";
}
