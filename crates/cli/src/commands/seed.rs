//! Seed the database with the demo accounts and events.
//!
//! Safe to run repeatedly: existing accounts are kept and events are only
//! added to an empty database.

use tracing::info;

use campus_events_server::db::PostgresStore;
use campus_events_server::db::seed::{DEMO_PASSWORD, seed_demo_data};

use super::{CommandError, connect};

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a demo record cannot
/// be written.
pub async fn demo() -> Result<(), CommandError> {
    let store = PostgresStore::new(connect().await?);

    let report = seed_demo_data(&store).await?;

    info!("Seeding complete!");
    info!("  Accounts created: {}", report.accounts);
    info!("  Events created: {}", report.events);
    info!("  Demo password: {DEMO_PASSWORD}");
    Ok(())
}
