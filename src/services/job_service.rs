use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{Collection, DocumentStore, Query, SortOrder};
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::utils::ordering::array_move;
use crate::utils::slug::slugify;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct JobService {
    jobs: Collection<Job>,
}

pub struct JobList {
    pub items: Vec<Job>,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl JobService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            jobs: Collection::new(store),
        }
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let mut filter = Query::new();
        if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
            match status.parse::<JobStatus>() {
                Ok(status) => filter = filter.eq("status", status.as_str()),
                // No job can carry an unknown status.
                Err(_) => {
                    return Ok(JobList {
                        items: Vec::new(),
                        page,
                        page_size,
                        total_pages: 0,
                        total_items: 0,
                    })
                }
            }
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            filter = filter.contains(&["title"], search);
        }

        let total_items = self.jobs.count(&filter).await?;
        let items = self
            .jobs
            .find(
                &filter
                    .order_by("order", SortOrder::Asc)
                    .offset((page - 1) * page_size)
                    .limit(page_size),
            )
            .await?;

        Ok(JobList {
            items,
            page,
            page_size,
            total_pages: (total_items + page_size - 1) / page_size,
            total_items,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Job> {
        self.jobs
            .get(&id.to_string())
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let job = Job {
            id: Uuid::new_v4(),
            slug: payload.slug.unwrap_or_else(|| slugify(&payload.title)),
            title: payload.title,
            status: payload.status.unwrap_or(JobStatus::Active),
            tags: payload.tags,
            order: self.next_order().await?,
        };
        self.jobs.insert(&job).await?;
        info!(job_id = %job.id, order = job.order, "Created job");
        Ok(job)
    }

    /// Partial update. A new `order` is applied as a move, so orders stay
    /// contiguous.
    pub async fn update(&self, id: Uuid, mut payload: UpdateJobPayload) -> Result<Job> {
        let to_order = payload.order.take();
        let affected = self.jobs.update(&id.to_string(), &payload).await?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Job {} not found", id)));
        }
        if to_order.is_some() {
            self.reorder(id, to_order).await?;
        }
        self.get_by_id(id).await
    }

    /// Moves job `id` to position `to_order` of the global ordering and
    /// rewrites every order as `0..N-1`. Out-of-range targets clamp to the
    /// last position. Without a target only the renumbering happens.
    pub async fn reorder(&self, id: Uuid, to_order: Option<i64>) -> Result<()> {
        let mut all = self
            .jobs
            .find(&Query::new().order_by("order", SortOrder::Asc))
            .await?;
        let from = all
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;

        if let Some(to) = to_order {
            let to = usize::try_from(to.max(0))
                .unwrap_or(usize::MAX)
                .min(all.len() - 1);
            array_move(&mut all, from, to);
        }

        let changed: Vec<Job> = all
            .into_iter()
            .enumerate()
            .filter_map(|(position, mut job)| {
                let position = position as i64;
                (job.order != position).then(|| {
                    job.order = position;
                    job
                })
            })
            .collect();

        if !changed.is_empty() {
            self.jobs.bulk_put(&changed).await?;
        }
        debug!(job_id = %id, ?to_order, rewritten = changed.len(), "Reordered jobs");
        Ok(())
    }

    async fn next_order(&self) -> Result<i64> {
        let last = self
            .jobs
            .find(&Query::new().order_by("order", SortOrder::Desc).limit(1))
            .await?;
        Ok(last.first().map_or(0, |job| job.order + 1))
    }
}
