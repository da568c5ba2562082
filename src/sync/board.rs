use tracing::warn;
use uuid::Uuid;

use crate::client::TalentApi;
use crate::dto::candidate_dto::{CandidateListQuery, UpdateCandidatePayload};
use crate::models::candidate::{Candidate, CandidateStage};
use crate::sync::cache::QueryCache;
use crate::sync::pending::{PendingMutation, Settled};
use crate::sync::{MutationError, Notices};

/// Where a dragged card was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Column(CandidateStage),
    /// Dropped onto another card; the card's column is the target.
    Card(Uuid),
}

/// Kanban view of candidates, one column per stage.
pub struct CandidateBoard<A> {
    api: A,
    query: CandidateListQuery,
    cache: QueryCache<CandidateListQuery, Vec<Candidate>>,
    pub notices: Notices,
}

impl<A: TalentApi> CandidateBoard<A> {
    pub fn new(api: A, query: CandidateListQuery) -> Self {
        Self {
            api,
            query,
            cache: QueryCache::new(),
            notices: Notices::default(),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.cache
            .get(&self.query)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fetches the list unless a fresh copy is cached.
    pub async fn load(&mut self) -> Result<&[Candidate], MutationError> {
        if self.cache.is_stale(&self.query) {
            self.refresh().await?;
        }
        Ok(self.candidates())
    }

    pub async fn refresh(&mut self) -> Result<(), MutationError> {
        let ticket = self.cache.begin_fetch(self.query.clone());
        let candidates = self.api.get_candidates(self.query.clone()).await?;
        self.cache.finish_fetch(ticket, candidates);
        Ok(())
    }

    pub fn columns(&self) -> Vec<(CandidateStage, Vec<&Candidate>)> {
        CandidateStage::ALL
            .into_iter()
            .map(|stage| {
                let cards = self
                    .candidates()
                    .iter()
                    .filter(|candidate| candidate.stage == stage)
                    .collect();
                (stage, cards)
            })
            .collect()
    }

    pub fn resolve_drop(&self, target: DropTarget) -> Option<CandidateStage> {
        match target {
            DropTarget::Column(stage) => Some(stage),
            DropTarget::Card(id) => self
                .candidates()
                .iter()
                .find(|candidate| candidate.id == id)
                .map(|candidate| candidate.stage),
        }
    }

    /// Returns `Ok(false)` when the drop does not change the stage.
    pub async fn handle_drop(
        &mut self,
        candidate_id: Uuid,
        target: DropTarget,
    ) -> Result<bool, MutationError> {
        let Some(stage) = self.resolve_drop(target) else {
            return Ok(false);
        };
        let current = self
            .candidates()
            .iter()
            .find(|candidate| candidate.id == candidate_id)
            .map(|candidate| candidate.stage)
            .ok_or(MutationError::UnknownItem(candidate_id))?;
        if current == stage {
            return Ok(false);
        }
        self.move_candidate(candidate_id, stage).await?;
        Ok(true)
    }

    /// Shows the candidate in `stage` at once and confirms with the server.
    /// On failure the board is put back exactly as it was.
    pub async fn move_candidate(
        &mut self,
        candidate_id: Uuid,
        stage: CandidateStage,
    ) -> Result<(), MutationError> {
        let key = self.query.clone();
        self.cache.cancel(&key);

        let snapshot = self.cache.get(&key).cloned().ok_or(MutationError::NotLoaded)?;
        if !snapshot.iter().any(|candidate| candidate.id == candidate_id) {
            return Err(MutationError::UnknownItem(candidate_id));
        }

        let pending = PendingMutation::begin(snapshot, |candidates| {
            for candidate in candidates.iter_mut().filter(|c| c.id == candidate_id) {
                candidate.stage = stage;
            }
        });
        self.cache.set(key.clone(), pending.speculative().clone());

        let result = self
            .api
            .update_candidate(candidate_id, UpdateCandidatePayload::stage(stage))
            .await;

        match pending.settle(result) {
            Settled::Committed(_) => {
                self.notices.success(format!("Moved to {}", stage));
                self.cache.invalidate(&key);
                if let Err(err) = self.refresh().await {
                    warn!(error = %err, "Could not refetch candidates after stage change");
                }
                Ok(())
            }
            Settled::RolledBack { snapshot, error } => {
                warn!(candidate_id = %candidate_id, error = %error, "Stage change failed, rolling back");
                self.cache.restore(key, Some(snapshot));
                self.notices
                    .error(format!("Could not move candidate: {}", error));
                Err(error.into())
            }
        }
    }
}
