use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{Collection, DocumentStore, Query, SortOrder};
use crate::dto::candidate_dto::{CandidateListQuery, StageCount, UpdateCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStage};
use crate::models::timeline::TimelineEvent;
use crate::utils::time;

#[derive(Clone)]
pub struct CandidateService {
    candidates: Collection<Candidate>,
    timeline: Collection<TimelineEvent>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            candidates: Collection::new(Arc::clone(&store)),
            timeline: Collection::new(store),
        }
    }

    /// Candidates matching every given filter, ordered by name.
    pub async fn list(&self, query: CandidateListQuery) -> Result<Vec<Candidate>> {
        let mut filter = Query::new();
        if let Some(stage) = query.stage.as_deref().filter(|s| !s.is_empty()) {
            match stage.parse::<CandidateStage>() {
                Ok(stage) => filter = filter.eq("stage", stage.as_str()),
                Err(_) => return Ok(Vec::new()),
            }
        }
        if let Some(job_id) = query.job_id {
            filter = filter.eq("jobId", job_id);
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            filter = filter.contains(&["name", "email"], search);
        }

        self.candidates
            .find(&filter.order_by("name", SortOrder::Asc))
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Candidate> {
        self.candidates
            .get(&id.to_string())
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    /// Applies a partial update. Moving the candidate to another stage also
    /// records a `stage-change` event on its timeline.
    pub async fn update(&self, id: Uuid, payload: UpdateCandidatePayload) -> Result<Candidate> {
        let current = self.get(id).await?;

        let affected = self.candidates.update(&id.to_string(), &payload).await?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Candidate {} not found", id)));
        }

        if let Some(stage) = payload.stage.filter(|stage| *stage != current.stage) {
            self.timeline
                .insert(&TimelineEvent::stage_change(id, stage, time::now()))
                .await?;
            info!(candidate_id = %id, from = %current.stage, to = %stage, "Candidate changed stage");
        }

        self.get(id).await
    }

    pub async fn timeline(&self, id: Uuid) -> Result<Vec<TimelineEvent>> {
        self.get(id).await?;
        self.timeline
            .find(
                &Query::new()
                    .eq("candidateId", id)
                    .order_by("date", SortOrder::Asc),
            )
            .await
    }

    pub async fn add_note(&self, id: Uuid, notes: String) -> Result<TimelineEvent> {
        self.get(id).await?;
        let event = TimelineEvent::note(id, notes, time::now());
        self.timeline.insert(&event).await?;
        debug!(candidate_id = %id, event_id = %event.id, "Added timeline note");
        Ok(event)
    }

    /// Candidate count of every stage, in board column order.
    pub async fn pipeline_summary(&self) -> Result<Vec<StageCount>> {
        let mut counts = Vec::with_capacity(CandidateStage::ALL.len());
        for stage in CandidateStage::ALL {
            let count = self
                .candidates
                .count(&Query::new().eq("stage", stage.as_str()))
                .await?;
            counts.push(StageCount { stage, count });
        }
        Ok(counts)
    }
}
