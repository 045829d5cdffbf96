use anyhow::{Context, Result};
use domain::Storage;
use persistence::{MemoryStorage, PgStorage};
use std::sync::Arc;
use tracing::info;

use trainer_hub_api::app::{create_app, AppState};
use trainer_hub_api::config::{Config, StorageBackend};
use trainer_hub_api::middleware::{self, init_metrics};

async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = persistence::db::create_pool(&(&config.database).into())
                .await
                .context("Failed to connect to the database")?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            Ok(Arc::new(PgStorage::new(pool)))
        }
        StorageBackend::Memory => {
            let storage = MemoryStorage::new();
            storage.seed_starter_library().await;
            info!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(storage))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    init_metrics()?;

    info!("Starting Trainer Hub API v{}", env!("CARGO_PKG_VERSION"));

    let storage = build_storage(&config).await?;
    let addr = config.socket_addr()?;

    let state = AppState::new(config, storage)?;
    let app = create_app(state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
