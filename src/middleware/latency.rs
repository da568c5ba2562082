use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rand::Rng;
use tracing::{trace, warn};

use crate::config::Config;
use crate::error::Error;

/// Artificial network conditions of the mock API.
#[derive(Clone, Debug)]
pub struct NetworkSimulator {
    latency_min: Duration,
    latency_max: Duration,
    failure_rate: f64,
    failure_delay: Duration,
}

impl NetworkSimulator {
    pub fn new(
        latency_min: Duration,
        latency_max: Duration,
        failure_rate: f64,
        failure_delay: Duration,
    ) -> Self {
        Self {
            latency_min: latency_min.min(latency_max),
            latency_max,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            failure_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.latency_min_ms),
            Duration::from_millis(config.latency_max_ms),
            config.reorder_failure_rate,
            Duration::from_millis(config.reorder_failure_delay_ms),
        )
    }

    /// No latency and no injected faults.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, 0.0, Duration::ZERO)
    }

    pub fn sample_latency(&self) -> Duration {
        if self.latency_max.is_zero() || self.latency_min == self.latency_max {
            return self.latency_max;
        }
        rand::thread_rng().gen_range(self.latency_min..=self.latency_max)
    }

    /// Rolls the dice for one fault-injectable call.
    pub fn should_fail(&self) -> bool {
        self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate)
    }

    pub fn failure_delay(&self) -> Duration {
        self.failure_delay
    }
}

async fn simulate_latency(simulator: &NetworkSimulator, path: &str) {
    let delay = simulator.sample_latency();
    if !delay.is_zero() {
        trace!(delay_ms = delay.as_millis() as u64, path = %path, "Simulating latency");
        tokio::time::sleep(delay).await;
    }
}

pub async fn latency_middleware(
    State(simulator): State<NetworkSimulator>,
    req: Request<Body>,
    next: Next,
) -> Response {
    simulate_latency(&simulator, req.uri().path()).await;
    next.run(req).await
}

/// Latency plus fault injection. A faulted call waits only the failure delay
/// and answers 500 with an empty body without reaching the handler.
pub async fn fault_middleware(
    State(simulator): State<NetworkSimulator>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if simulator.should_fail() {
        warn!(path = %req.uri().path(), "Injecting server failure");
        tokio::time::sleep(simulator.failure_delay()).await;
        return Error::TransientFailure.into_response();
    }
    simulate_latency(&simulator, req.uri().path()).await;
    next.run(req).await
}
