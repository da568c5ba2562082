use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::database::{Collection, DocumentStore, Query, SortOrder};
use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateStage};
use crate::models::job::{Job, JobStatus};
use crate::models::timeline::TimelineEvent;
use crate::utils::{slug::slugify, time};

pub const TAGS: [&str; 5] = ["React", "TypeScript", "Remote", "Node.js", "GraphQL"];

const SENIORITY: [&str; 5] = ["Junior", "Mid-level", "Senior", "Lead", "Principal"];

const ROLES: [&str; 12] = [
    "Frontend Engineer",
    "Backend Engineer",
    "Full Stack Developer",
    "Product Designer",
    "Data Analyst",
    "DevOps Engineer",
    "QA Engineer",
    "Mobile Developer",
    "Engineering Manager",
    "Site Reliability Engineer",
    "Technical Writer",
    "Security Engineer",
];

const FIRST_NAMES: [&str; 16] = [
    "Ava", "Liam", "Maya", "Noah", "Zara", "Omar", "Ivy", "Leo", "Nina", "Ravi", "Sofia", "Kenji",
    "Amara", "Lucas", "Elena", "Tariq",
];

const LAST_NAMES: [&str; 16] = [
    "Patel", "Nguyen", "Garcia", "Kim", "Okafor", "Smith", "Rossi", "Haddad", "Silva", "Novak",
    "Jensen", "Tanaka", "Mensah", "Dubois", "Kowalski", "Reyes",
];

/// How many records the store should hold after seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTargets {
    pub jobs: usize,
    pub candidates: usize,
}

impl SeedTargets {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jobs: config.seed_job_count,
            candidates: config.seed_candidate_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub jobs: usize,
    pub candidates: usize,
    pub events: usize,
    pub skipped: bool,
}

/// Records produced by one seeding run, not yet persisted.
#[derive(Debug, Default)]
pub struct SeedData {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub events: Vec<TimelineEvent>,
}

/// What a seeding run has to add on top of the existing records.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub new_jobs: usize,
    pub first_order: i64,
    pub existing_job_ids: Vec<Uuid>,
    pub new_candidates: usize,
    pub until: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SeedService {
    jobs: Collection<Job>,
    candidates: Collection<Candidate>,
    timeline: Collection<TimelineEvent>,
    targets: SeedTargets,
}

impl SeedService {
    pub fn new(store: Arc<dyn DocumentStore>, targets: SeedTargets) -> Self {
        Self {
            jobs: Collection::new(Arc::clone(&store)),
            candidates: Collection::new(Arc::clone(&store)),
            timeline: Collection::new(store),
            targets,
        }
    }

    /// Fills the store up to the configured targets. A store that already
    /// holds enough jobs is left untouched.
    pub async fn seed(&self) -> Result<SeedReport> {
        let existing_jobs = self.jobs.find(&Query::new().order_by("order", SortOrder::Asc)).await?;
        if existing_jobs.len() >= self.targets.jobs {
            info!(jobs = existing_jobs.len(), "Store already seeded, skipping");
            return Ok(SeedReport {
                skipped: true,
                ..SeedReport::default()
            });
        }

        let existing_candidates = self.candidates.count(&Query::new()).await?;
        let plan = SeedPlan {
            new_jobs: self.targets.jobs - existing_jobs.len(),
            first_order: existing_jobs.last().map_or(0, |job| job.order + 1),
            existing_job_ids: existing_jobs.iter().map(|job| job.id).collect(),
            new_candidates: self
                .targets
                .candidates
                .saturating_sub(usize::try_from(existing_candidates).unwrap_or(0)),
            until: time::now(),
        };

        let data = generate(&plan, &mut rand::thread_rng());

        self.jobs.bulk_insert(&data.jobs).await?;
        self.candidates.bulk_insert(&data.candidates).await?;
        self.timeline.bulk_insert(&data.events).await?;

        let report = SeedReport {
            jobs: data.jobs.len(),
            candidates: data.candidates.len(),
            events: data.events.len(),
            skipped: false,
        };
        info!(
            jobs = report.jobs,
            candidates = report.candidates,
            events = report.events,
            "Seeded store"
        );
        Ok(report)
    }
}

pub fn generate<R: Rng + ?Sized>(plan: &SeedPlan, rng: &mut R) -> SeedData {
    let jobs: Vec<Job> = (0..plan.new_jobs)
        .map(|i| random_job(rng, plan.first_order + i as i64))
        .collect();

    let job_ids: Vec<Uuid> = plan
        .existing_job_ids
        .iter()
        .copied()
        .chain(jobs.iter().map(|job| job.id))
        .collect();

    let mut data = SeedData {
        jobs,
        ..SeedData::default()
    };
    if job_ids.is_empty() {
        return data;
    }

    for i in 0..plan.new_candidates {
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let stage = CandidateStage::ALL[rng.gen_range(0..CandidateStage::ALL.len())];
        let candidate = Candidate {
            id: Uuid::new_v4(),
            name: format!("{} {}", first, last),
            email: format!(
                "{}.{}.{}@example.com",
                first.to_lowercase(),
                last.to_lowercase(),
                i
            ),
            job_id: job_ids[rng.gen_range(0..job_ids.len())],
            stage,
        };

        let history = stage_history(stage, rng);
        data.events
            .extend(timeline_for(candidate.id, &history, plan.until, rng));
        data.candidates.push(candidate);
    }

    data
}

fn random_job<R: Rng + ?Sized>(rng: &mut R, order: i64) -> Job {
    let title = format!(
        "{} {}",
        SENIORITY[rng.gen_range(0..SENIORITY.len())],
        ROLES[rng.gen_range(0..ROLES.len())]
    );
    let tag_count = rng.gen_range(1..=3);
    let tags = TAGS
        .choose_multiple(rng, tag_count)
        .map(|tag| tag.to_string())
        .collect();

    Job {
        id: Uuid::new_v4(),
        slug: format!("{}-{}", slugify(&title), order),
        title,
        status: if rng.gen_bool(0.75) {
            JobStatus::Active
        } else {
            JobStatus::Archived
        },
        tags,
        order,
    }
}

/// Stages a candidate went through to reach `current`, oldest first.
pub fn stage_history<R: Rng + ?Sized>(current: CandidateStage, rng: &mut R) -> Vec<CandidateStage> {
    match current {
        CandidateStage::Rejected => {
            let reached = rng.gen_range(1..=3);
            let mut history = CandidateStage::PIPELINE[..reached].to_vec();
            history.push(CandidateStage::Rejected);
            history
        }
        stage => {
            let reached = CandidateStage::PIPELINE
                .iter()
                .position(|s| *s == stage)
                .map_or(1, |position| position + 1);
            CandidateStage::PIPELINE[..reached].to_vec()
        }
    }
}

/// One `stage-change` event per stage, spaced hours to days apart and
/// ending no later than `until`.
fn timeline_for<R: Rng + ?Sized>(
    candidate_id: Uuid,
    history: &[CandidateStage],
    until: DateTime<Utc>,
    rng: &mut R,
) -> Vec<TimelineEvent> {
    let gaps: Vec<Duration> = history
        .iter()
        .map(|_| Duration::minutes(rng.gen_range(60..=60 * 24 * 5)))
        .collect();
    let span = gaps.iter().fold(Duration::zero(), |acc, gap| acc + *gap);
    let mut date = until - span - Duration::days(rng.gen_range(0..60));

    history
        .iter()
        .zip(gaps)
        .map(|(stage, gap)| {
            date += gap;
            TimelineEvent::stage_change(candidate_id, *stage, date)
        })
        .collect()
}
