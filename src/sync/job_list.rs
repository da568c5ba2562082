use tracing::warn;
use uuid::Uuid;

use crate::client::TalentApi;
use crate::dto::job_dto::{JobListQuery, JobListResponse, UpdateJobPayload};
use crate::models::job::{Job, JobStatus};
use crate::sync::cache::QueryCache;
use crate::sync::pending::{PendingMutation, Settled};
use crate::sync::{MutationError, Notices};
use crate::utils::ordering::array_move;

/// Paginated, drag-sortable job list.
pub struct JobListView<A> {
    api: A,
    query: JobListQuery,
    cache: QueryCache<JobListQuery, JobListResponse>,
    pub notices: Notices,
}

impl<A: TalentApi> JobListView<A> {
    pub fn new(api: A, query: JobListQuery) -> Self {
        Self {
            api,
            query,
            cache: QueryCache::new(),
            notices: Notices::default(),
        }
    }

    pub fn query(&self) -> &JobListQuery {
        &self.query
    }

    /// Switches page or filters. Pages already visited stay cached.
    pub fn set_query(&mut self, query: JobListQuery) {
        self.query = query;
    }

    pub fn page(&self) -> Option<&JobListResponse> {
        self.cache.get(&self.query)
    }

    pub fn jobs(&self) -> &[Job] {
        self.page().map(|page| page.data.as_slice()).unwrap_or(&[])
    }

    pub async fn load(&mut self) -> Result<&JobListResponse, MutationError> {
        if self.cache.is_stale(&self.query) {
            let ticket = self.cache.begin_fetch(self.query.clone());
            let page = self.api.get_jobs(self.query.clone()).await?;
            self.cache.finish_fetch(ticket, page);
        }
        self.page().ok_or(MutationError::NotLoaded)
    }

    /// Drops job `active_id` where `over_id` currently is. The page shows the
    /// new order at once; the dragged job takes over the global `order` of
    /// the job it was dropped on. Once the server confirms, the page is
    /// refetched, since jobs hidden by the filter shift as well.
    pub async fn reorder(&mut self, active_id: Uuid, over_id: Uuid) -> Result<bool, MutationError> {
        if active_id == over_id {
            return Ok(false);
        }

        let key = self.query.clone();
        self.cache.cancel(&key);
        let snapshot = self.cache.get(&key).cloned().ok_or(MutationError::NotLoaded)?;

        let position = |id: Uuid| {
            snapshot
                .data
                .iter()
                .position(|job| job.id == id)
                .ok_or(MutationError::UnknownItem(id))
        };
        let from = position(active_id)?;
        let to = position(over_id)?;
        let target_order = snapshot.data[to].order;

        let pending = PendingMutation::begin(snapshot, |page| {
            let orders: Vec<i64> = page.data.iter().map(|job| job.order).collect();
            array_move(&mut page.data, from, to);
            for (job, order) in page.data.iter_mut().zip(orders) {
                job.order = order;
            }
        });
        self.cache.set(key.clone(), pending.speculative().clone());

        let result = self.api.reorder_job(active_id, Some(target_order)).await;
        match pending.settle(result) {
            Settled::Committed(_) => {
                self.cache.cancel(&key);
                self.cache.invalidate(&key);
                if let Err(err) = self.load().await {
                    warn!(error = %err, "Could not refetch jobs after reorder");
                }
                Ok(true)
            }
            Settled::RolledBack { snapshot, error } => {
                warn!(job_id = %active_id, error = %error, "Reorder failed, rolling back");
                self.cache.restore(key, Some(snapshot));
                self.notices
                    .error(format!("Could not reorder jobs: {}", error));
                Err(error.into())
            }
        }
    }

    /// Flips a job between active and archived, then refetches every page.
    pub async fn toggle_archive(&mut self, job_id: Uuid) -> Result<Job, MutationError> {
        let status = self
            .jobs()
            .iter()
            .find(|job| job.id == job_id)
            .map(|job| job.status.toggled())
            .ok_or(MutationError::UnknownItem(job_id))?;

        match self
            .api
            .update_job(job_id, UpdateJobPayload::status(status))
            .await
        {
            Ok(job) => {
                let verb = match status {
                    JobStatus::Archived => "Archived",
                    JobStatus::Active => "Restored",
                };
                self.notices.success(format!("{} \"{}\"", verb, job.title));
                self.cache.invalidate_all();
                Ok(job)
            }
            Err(error) => {
                self.notices
                    .error(format!("Could not update job: {}", error));
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiError, MockTalentApi};
    use crate::dto::{Pagination, SuccessResponse};
    use mockall::Sequence;

    fn page(titles: &[&str]) -> JobListResponse {
        let data: Vec<Job> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Job {
                id: Uuid::new_v4(),
                title: title.to_string(),
                slug: title.to_lowercase(),
                status: JobStatus::Active,
                tags: Vec::new(),
                order: 10 + i as i64,
            })
            .collect();
        JobListResponse {
            pagination: Pagination {
                page: 2,
                page_size: 10,
                total_pages: 2,
                total_items: 10 + data.len() as i64,
            },
            data,
        }
    }

    fn titles<A: TalentApi>(view: &JobListView<A>) -> Vec<&str> {
        view.jobs().iter().map(|job| job.title.as_str()).collect()
    }

    #[tokio::test]
    async fn successful_reorder_refetches_the_server_page() {
        let loaded = page(&["A", "B", "C", "D"]);
        let (a, c) = (loaded.data[0].id, loaded.data[2].id);

        // What the server reports once the move has landed.
        let mut confirmed = loaded.clone();
        array_move(&mut confirmed.data, 0, 2);
        for (job, order) in confirmed.data.iter_mut().zip([20, 22, 23, 25]) {
            job.order = order;
        }

        let mut api = MockTalentApi::new();
        let mut seq = Sequence::new();
        let first = loaded.clone();
        api.expect_get_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(first.clone()));
        api.expect_reorder_job()
            .withf(move |id, to| *id == a && *to == Some(12))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(SuccessResponse::ok()));
        let refetched = confirmed.clone();
        api.expect_get_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(refetched.clone()));

        let mut view = JobListView::new(api, JobListQuery::default());
        view.load().await.unwrap();

        assert!(view.reorder(a, c).await.unwrap());
        assert_eq!(titles(&view), vec!["B", "C", "A", "D"]);
        assert_eq!(view.page(), Some(&confirmed));
        // Fresh again, so no further fetch.
        view.load().await.unwrap();
    }

    #[tokio::test]
    async fn failed_reorder_restores_the_previous_page() {
        let loaded = page(&["A", "B", "C"]);
        let (a, c) = (loaded.data[0].id, loaded.data[2].id);

        let mut api = MockTalentApi::new();
        let first = loaded.clone();
        api.expect_get_jobs()
            .times(1)
            .returning(move |_| Ok(first.clone()));
        api.expect_reorder_job().times(1).returning(|_, _| {
            Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".into(),
            })
        });

        let mut view = JobListView::new(api, JobListQuery::default());
        view.load().await.unwrap();

        assert!(view.reorder(a, c).await.is_err());
        assert_eq!(view.page(), Some(&loaded));
        assert!(view
            .notices
            .last()
            .unwrap()
            .message
            .starts_with("Could not reorder jobs"));
    }

    #[tokio::test]
    async fn toggle_archive_invalidates_cached_pages() {
        let loaded = page(&["A"]);
        let id = loaded.data[0].id;
        let mut archived = loaded.data[0].clone();
        archived.status = JobStatus::Archived;

        let mut api = MockTalentApi::new();
        let first = loaded.clone();
        api.expect_get_jobs()
            .times(2)
            .returning(move |_| Ok(first.clone()));
        api.expect_update_job()
            .withf(|_, payload| payload.status == Some(JobStatus::Archived))
            .times(1)
            .returning(move |_, _| Ok(archived.clone()));

        let mut view = JobListView::new(api, JobListQuery::default());
        view.load().await.unwrap();
        let job = view.toggle_archive(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Archived);
        view.load().await.unwrap();
    }
}
