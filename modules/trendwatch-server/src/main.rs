use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trendwatch_common::{Config, Registry};
use trendwatch_scraper::storage::Store;

mod routes;
mod scheduler;

pub struct AppState {
    pub config: Config,
    pub registry: Registry,
    pub store: Store,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("trendwatch=info".parse()?))
        .init();

    info!("Trendwatch starting...");

    let config = Config::from_env();
    let registry = Registry::load(&config.creators_file);
    if registry.targets.is_empty() {
        warn!("Creator registry is empty; scheduled sweeps will only capture hashtags");
    }

    let store = Store::new(&config.storage_path);
    store.ensure_dirs(&registry.targets)?;

    // Full sweep once at startup, then at the top of every fourth hour.
    scheduler::start(config.clone(), registry.clone(), store.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        registry,
        store,
    });

    let app = Router::new()
        .route("/", get(routes::health))
        .route("/scrape", post(routes::scrape))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!(addr = addr.as_str(), "Scraper API listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
