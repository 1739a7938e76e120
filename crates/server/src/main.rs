//! Campus Events server.
//!
//! # Architecture
//!
//! - Axum web framework; form-encoded input, JSON view models out
//! - Storage behind the `EventStore` trait: `PostgreSQL` or in-memory,
//!   chosen by `CAMPUS_STORAGE`
//! - tower-sessions cookie sessions holding only the user id
//!
//! With the `postgres` backend, migrations run on startup so a fresh
//! database is usable immediately. The memory backend is seeded with demo
//! accounts and events unless `CAMPUS_SEED_DEMO=false`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use campus_events_server::config::{ServerConfig, StorageBackend};
use campus_events_server::db::{self, EventStore, MemoryStore, PostgresStore};
use campus_events_server::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campus_events_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let app = match config.storage.clone() {
        StorageBackend::Memory { seed_demo } => {
            let store = Arc::new(MemoryStore::new());
            if seed_demo {
                let report = db::seed::seed_demo_data(store.as_ref())
                    .await
                    .expect("Failed to seed demo data");
                tracing::info!(
                    accounts = report.accounts,
                    events = report.events,
                    "Demo data seeded"
                );
            }
            tracing::info!("Using in-memory storage");

            let store: Arc<dyn EventStore> = store;
            campus_events_server::app(
                AppState::new(config.clone(), store),
                tower_sessions::MemoryStore::default(),
            )
        }
        StorageBackend::Postgres { database_url } => {
            let pool = db::create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            let session_store = tower_sessions_sqlx_store::PostgresStore::new(pool.clone());
            session_store
                .migrate()
                .await
                .expect("Failed to migrate session store");

            let store: Arc<dyn EventStore> = Arc::new(PostgresStore::new(pool));
            campus_events_server::app(AppState::new(config.clone(), store), session_store)
        }
    };

    // Start server
    let addr = config.socket_addr();
    tracing::info!("campus events listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Peer addresses feed the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
