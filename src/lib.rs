pub mod builder;
pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod sync;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::DocumentStore;
use crate::middleware::latency::NetworkSimulator;
use crate::services::{
    assessment_service::AssessmentService,
    candidate_service::CandidateService,
    job_service::JobService,
    seed_service::{SeedService, SeedTargets},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub simulator: NetworkSimulator,
    pub job_service: JobService,
    pub candidate_service: CandidateService,
    pub assessment_service: AssessmentService,
    pub seed_service: SeedService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        let simulator = NetworkSimulator::from_config(config);
        let job_service = JobService::new(Arc::clone(&store));
        let candidate_service = CandidateService::new(Arc::clone(&store));
        let assessment_service = AssessmentService::new(Arc::clone(&store));
        let seed_service = SeedService::new(Arc::clone(&store), SeedTargets::from_config(config));

        Self {
            store,
            simulator,
            job_service,
            candidate_service,
            assessment_service,
            seed_service,
        }
    }
}
