use std::net::SocketAddr;
use std::sync::Arc;

use talentflow_backend::{
    config::{get_config, init_config},
    database::pool::open_store,
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    init_config()?;
    let config = get_config();

    let store = open_store(&config.database_url).await?;
    info!(database_url = %config.database_url, "Local store ready");

    let app_state = AppState::new(Arc::new(store), config);

    if config.seed_on_startup {
        let report = app_state.seed_service.seed().await?;
        if !report.skipped {
            info!(
                jobs = report.jobs,
                candidates = report.candidates,
                "Seeded store on startup"
            );
        }
    }

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!(
        "Mock API listening on {} (latency {}-{}ms, reorder failure rate {})",
        addr, config.latency_min_ms, config.latency_max_ms, config.reorder_failure_rate
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
