use anyhow::{Context, Result};
use dotenvy::dotenv;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

mod config;
mod controllers;
mod dates;
mod db_ops;
mod errors;
mod extractors;
mod logging;
mod middleware;
mod models;
mod routes;
mod tags;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = config::Config::from_env()?;
    logging::init(config.log_format);

    let db = create_pool(&config).await?;
    db_ops::ensure_schema(&db)
        .await
        .context("could not create the note table")?;
    let app = routes::build_app(models::AppState { db });

    let addr = config.socket_addr()?;
    info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn create_pool(config: &config::Config) -> Result<SqlitePool> {
    info!(
        url = %config.database_url,
        max_connections = config.max_connections,
        "connecting to database"
    );
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("could not open {}", config.database_url))
}
