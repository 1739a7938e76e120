//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions)
//! 5. Rate limiting on auth routes (governor)
//!
//! Authorization is not a layer: handlers take [`RequireAuth`] or
//! [`RequireRole`] extractors, which resolve [`SessionState`] per request.

pub mod auth;
pub mod guard;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{SessionSnapshot, SessionState, clear_current_user, set_current_user};
pub use guard::{
    AdminOnly, FacultyOnly, FacultyOrAdmin, GuardDecision, RequireAuth, RequireRole, RolePolicy,
    StudentOnly, authorize,
};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
