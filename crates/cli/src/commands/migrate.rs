//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! campus-cli migrate
//! ```
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time. The server also applies them on startup.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
