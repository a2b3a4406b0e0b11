use std::sync::Arc;

use vod_analytics::api::{create_router, AppState};
use vod_analytics::config::Config;
use vod_analytics::db::{create_pool, create_redis_client, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vod_analytics=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = create_redis_client(&config.redis_url)?;

    let state = AppState::new(Arc::new(PgStore::new(pool, redis_client)));
    let app = create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Analytics service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
