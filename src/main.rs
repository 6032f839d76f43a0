mod config;
mod entities;
mod error;
mod models;
mod response;
mod routes;
mod services;

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

use config::Config;
use routes::{create_routes, AppState};
use services::repository::SeaOrmEntryRepository;
use services::s3::S3MediaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("database migrations applied");

    let store = S3MediaStore::new(&config);
    if let Err(e) = store.ensure_bucket_exists().await {
        tracing::warn!(error = %e, bucket = %config.s3_bucket_name, "could not prepare media bucket");
    }

    let state = AppState::new(
        Arc::new(SeaOrmEntryRepository::new(db)),
        Arc::new(store),
    );
    let app = create_routes(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
