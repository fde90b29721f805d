use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailhead_api::{
    config::{Config, EngineConfig},
    db::{create_pool, create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{catalog::PgCatalogStore, engagement::PgEngagementStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailhead_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let engine = EngineConfig::from_config(&config);

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Connected to PostgreSQL");

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let state = AppState {
        catalog: Arc::new(PgCatalogStore::new(pool.clone())),
        engagement: Arc::new(PgEngagementStore::new(pool)),
        cache,
        engine: Arc::new(engine),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Trip recommendation service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush any cache writes still queued before the process exits.
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
