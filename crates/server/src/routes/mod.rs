//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (featured events)
//! GET  /features                - Features page
//! GET  /about                   - About page
//! GET  /contact                 - Contact page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (store ping)
//!
//! # Events
//! GET  /events                  - Approved events (?category=, ?q=)
//! GET  /events/{id}             - Event detail
//! GET  /events/register/{id}    - Registration form (requires auth)
//! POST /events/register/{id}    - Submit registration (requires auth)
//! GET  /events/registered       - Own registrations (requires auth)
//!
//! # Auth (rate limited POSTs)
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! GET  /signup                  - Sign-up page
//! POST /signup                  - Sign-up action
//! POST /logout                  - Logout action
//! GET  /session                 - Session snapshot
//! GET  /profile                 - Own profile (requires auth)
//! POST /profile                 - Update own profile (requires auth)
//!
//! # Student dashboard
//! GET  /dashboard/student
//!
//! # Faculty dashboard
//! GET    /dashboard/faculty
//! POST   /dashboard/faculty/events                    - Create event
//! POST   /dashboard/faculty/events/{id}               - Update own event
//! DELETE /dashboard/faculty/events/{id}               - Delete own event
//! GET    /dashboard/faculty/events/{id}/registrations - Registrations
//!
//! # Admin dashboard
//! GET    /dashboard/admin
//! GET    /dashboard/admin/events               - All events (?status=)
//! POST   /dashboard/admin/events/{id}/status   - Approve or reject
//! POST   /dashboard/admin/events/{id}          - Update any event
//! DELETE /dashboard/admin/events/{id}          - Delete any event
//! GET    /dashboard/admin/events/{id}/registrations - Registrations
//! GET    /dashboard/admin/events/{id}/approvals - Approval trail
//! ```
//!
//! Any other path redirects to `/`.

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod pages;
pub mod profile;
pub mod registration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};

use crate::config::ServerConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// The login and sign-up actions are rate limited per client IP when
/// enabled in `config`.
pub fn auth_routes(config: &ServerConfig) -> Router<AppState> {
    let guarded = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup));

    let guarded = match config.auth_rate_limit.then(auth_rate_limiter).flatten() {
        Some(limiter) => guarded.layer(limiter),
        None => guarded,
    };

    guarded
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session_status))
        .route("/profile", get(profile::show).post(profile::update))
}

/// Create the event routes router.
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(events::index))
        .route("/registered", get(registration::registered))
        .route(
            "/register/{id}",
            get(registration::form).post(registration::submit),
        )
        .route("/{id}", get(events::show))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/student", get(dashboard::student))
        .route("/faculty", get(dashboard::faculty))
        .route("/faculty/events", post(dashboard::create_event))
        .route(
            "/faculty/events/{id}",
            post(dashboard::update_event).delete(dashboard::delete_own_event),
        )
        .route(
            "/faculty/events/{id}/registrations",
            get(dashboard::event_registrations),
        )
        .route("/admin", get(dashboard::admin))
        .route("/admin/events", get(dashboard::all_events))
        .route(
            "/admin/events/{id}",
            post(dashboard::admin_update_event).delete(dashboard::delete_event),
        )
        .route(
            "/admin/events/{id}/registrations",
            get(dashboard::admin_event_registrations),
        )
        .route("/admin/events/{id}/status", post(dashboard::set_status))
        .route("/admin/events/{id}/approvals", get(dashboard::approvals))
}

/// Create all application routes.
pub fn routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/features", get(pages::features))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth_routes(config))
        .nest("/events", event_routes())
        .nest("/dashboard", dashboard_routes())
        .fallback(|| async { Redirect::to("/") })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Pings the storage backend; 503 when it is unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
