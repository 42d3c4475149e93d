use std::sync::Arc;

use course_recommender::{
    api::{create_router, AppState},
    config::Config,
    data::{CatalogSnapshot, CsvDirectorySource, TableSource},
    services::{Jitter, Recommender, SeededJitter, UniformJitter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Missing required tables are a startup failure
    let source = Arc::new(CsvDirectorySource::new(&config.data_dir));
    let snapshot = CatalogSnapshot::build(source.load().await?);

    let jitter: Arc<dyn Jitter> = match config.jitter_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded scoring jitter");
            Arc::new(SeededJitter::new(seed))
        }
        None => Arc::new(UniformJitter),
    };

    let state = AppState::new(snapshot, source, Recommender::new(jitter, config.top_k));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
