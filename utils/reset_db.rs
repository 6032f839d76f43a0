use anyhow::Context;
use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};

const TABLES: [&str; 2] = ["placed_entries", "seaql_migrations"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = Database::connect(database_url)
        .await
        .context("failed to connect to database")?;

    for table in TABLES {
        db.execute(Statement::from_string(
            DbBackend::Postgres,
            format!("DROP TABLE IF EXISTS \"{table}\" CASCADE;"),
        ))
        .await
        .with_context(|| format!("failed to drop {table}"))?;
        tracing::info!(table, "dropped");
    }

    tracing::info!("database reset; migrations will rerun on next start");
    Ok(())
}
