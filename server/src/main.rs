use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use refinery::config::{Config, ConfigDbType};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use server::api::run_api_server;
use server::db::ScoreStore;
use server::db::postgres::PgScoreStore;

mod migrations {
    use refinery::embed_migrations;
    embed_migrations!("./migrations");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if exists
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Database setup
    let db_host = env::var("SNAKEBOARD_DB_HOST")
        .context("SNAKEBOARD_DB_HOST must be set in environment or .env file")?;
    let db_port = env::var("SNAKEBOARD_DB_PORT")
        .context("SNAKEBOARD_DB_PORT must be set in environment or .env file")?;
    let db_user = env::var("SNAKEBOARD_DB_USER")
        .context("SNAKEBOARD_DB_USER must be set in environment or .env file")?;
    let db_pass = env::var("SNAKEBOARD_DB_PASS")
        .context("SNAKEBOARD_DB_PASS must be set in environment or .env file")?;
    let db_name = env::var("SNAKEBOARD_DB_NAME")
        .context("SNAKEBOARD_DB_NAME must be set in environment or .env file")?;

    // Build database connection string
    let db_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        db_user, db_pass, db_host, db_port, db_name
    );

    // Run migrations
    let mut db_config = Config::new(ConfigDbType::Postgres)
        .set_db_host(&db_host)
        .set_db_port(&db_port)
        .set_db_user(&db_user)
        .set_db_pass(&db_pass)
        .set_db_name(&db_name);

    let _migrations_report = migrations::migrations::runner()
        .run_async(&mut db_config)
        .await?;
    info!("Database migrations completed");

    // Create database pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("Failed to create PostgreSQL connection pool")?;

    let api_port = env::var("SNAKEBOARD_API_PORT").unwrap_or_else(|_| "8080".to_string());
    let api_addr = format!("0.0.0.0:{}", api_port);

    let store: Arc<dyn ScoreStore> = Arc::new(PgScoreStore::new(db_pool));
    run_api_server(&api_addr, store).await
}
