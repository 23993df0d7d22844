use std::sync::Arc;
use std::time::Duration;

use movie_recommender::{
    api::{create_router, AppState, SessionLimits},
    catalog::Catalog,
    config::Config,
    services::providers::omdb::OmdbProvider,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Row alignment between catalog and matrix is checked here; a bad artifact stops startup
    let catalog = Catalog::load(&config.artifact_path)?;

    let metadata = OmdbProvider::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
        Duration::from_secs(config.metadata_timeout_secs),
    )?;

    let state = AppState::new(catalog, Arc::new(metadata)).with_session_limits(SessionLimits {
        capacity: config.session_capacity,
        idle_timeout: Duration::from_secs(config.session_idle_secs),
    });
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
