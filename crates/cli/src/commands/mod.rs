//! CLI subcommands.
//!
//! Every command talks to the `PostgreSQL` database named by
//! `CAMPUS_DATABASE_URL`, falling back to `DATABASE_URL`.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use campus_events_server::db;
use campus_events_server::db::seed::SeedError;
use campus_events_server::services::identity::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Seeding failed: {0}")]
    Seed(#[from] SeedError),

    #[error("Account creation failed: {0}")]
    Account(#[from] AuthError),
}

/// Connect to the configured database.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = ["CAMPUS_DATABASE_URL", "DATABASE_URL"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map(SecretString::from)
        .ok_or(CommandError::MissingEnvVar("CAMPUS_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
