use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::collection::Record;
use crate::models::candidate::CandidateStage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimelineEntry {
    StageChange { stage: CandidateStage },
    Note { notes: String },
}

/// Append-only history item attached to one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: Uuid,
    pub candidate_id: Uuid,
    #[serde(with = "crate::utils::time::millis")]
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: TimelineEntry,
}

impl TimelineEvent {
    pub fn stage_change(candidate_id: Uuid, stage: CandidateStage, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id,
            date,
            entry: TimelineEntry::StageChange { stage },
        }
    }

    pub fn note(candidate_id: Uuid, notes: String, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id,
            date,
            entry: TimelineEntry::Note { notes },
        }
    }

    pub fn stage(&self) -> Option<CandidateStage> {
        match self.entry {
            TimelineEntry::StageChange { stage } => Some(stage),
            TimelineEntry::Note { .. } => None,
        }
    }
}

impl Record for TimelineEvent {
    const COLLECTION: &'static str = "timeline";
}
