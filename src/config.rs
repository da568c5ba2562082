use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
    pub reorder_failure_rate: f64,
    pub reorder_failure_delay_ms: u64,
    pub seed_job_count: usize,
    pub seed_candidate_count: usize,
    pub seed_on_startup: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3001".to_string(),
            database_url: "sqlite://talentflow.db".to_string(),
            latency_min_ms: 200,
            latency_max_ms: 1200,
            reorder_failure_rate: 0.1,
            reorder_failure_delay_ms: 1000,
            seed_job_count: 25,
            seed_candidate_count: 1000,
            seed_on_startup: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        let config = Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            latency_min_ms: get_env_parse_or("LATENCY_MIN_MS", defaults.latency_min_ms)?,
            latency_max_ms: get_env_parse_or("LATENCY_MAX_MS", defaults.latency_max_ms)?,
            reorder_failure_rate: get_env_parse_or(
                "REORDER_FAILURE_RATE",
                defaults.reorder_failure_rate,
            )?,
            reorder_failure_delay_ms: get_env_parse_or(
                "REORDER_FAILURE_DELAY_MS",
                defaults.reorder_failure_delay_ms,
            )?,
            seed_job_count: get_env_parse_or("SEED_JOB_COUNT", defaults.seed_job_count)?,
            seed_candidate_count: get_env_parse_or(
                "SEED_CANDIDATE_COUNT",
                defaults.seed_candidate_count,
            )?,
            seed_on_startup: get_env_parse_or("SEED_ON_STARTUP", defaults.seed_on_startup)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.latency_min_ms > self.latency_max_ms {
            return Err(Error::Config(format!(
                "LATENCY_MIN_MS ({}) must not exceed LATENCY_MAX_MS ({})",
                self.latency_min_ms, self.latency_max_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.reorder_failure_rate) {
            return Err(Error::Config(format!(
                "REORDER_FAILURE_RATE must be within [0, 1], got {}",
                self.reorder_failure_rate
            )));
        }
        Ok(())
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
