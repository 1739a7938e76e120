//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CAMPUS_HOST` - Bind address (default: 127.0.0.1)
//! - `CAMPUS_PORT` - Listen port (default: 3000)
//! - `CAMPUS_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `CAMPUS_STORAGE` - `memory` or `postgres` (default: `postgres` when a
//!   database URL is configured, `memory` otherwise)
//! - `CAMPUS_DATABASE_URL` - `PostgreSQL` connection string, falling back to
//!   `DATABASE_URL`
//! - `CAMPUS_SEED_DEMO` - Seed demo accounts and events (default: true)
//! - `CAMPUS_AUTH_RATE_LIMIT` - Rate limit the sign-in/sign-up routes
//!   (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Template values that are placeholders only when they make up a whole
/// value or URL component (case-insensitive).
const PLACEHOLDER_VALUES: &[&str] = &[
    "changeme",
    "change-me",
    "placeholder",
    "replace-me",
    "xxx",
    "todo",
    "fixme",
];

/// Prefixes that mark a value or URL component as an unfilled template.
const PLACEHOLDER_PREFIXES: &[&str] = &[
    "your-",
    "your_",
    "<",
    "enter-",
    "insert-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Environment variable {0} still holds a placeholder value")]
    PlaceholderEnvVar(String),
}

/// Which storage backend to run on.
#[derive(Clone)]
pub enum StorageBackend {
    /// In-process tables, optionally seeded with demo data.
    Memory { seed_demo: bool },
    /// `PostgreSQL` at the given URL.
    Postgres { database_url: SecretString },
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory { seed_demo } => f
                .debug_struct("Memory")
                .field("seed_demo", seed_demo)
                .finish(),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Storage backend
    pub storage: StorageBackend,
    /// Whether the sign-in/sign-up routes are rate limited
    pub auth_rate_limit: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if
    /// `CAMPUS_STORAGE=postgres` is set without a usable database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CAMPUS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAMPUS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CAMPUS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAMPUS_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("CAMPUS_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CAMPUS_BASE_URL".to_string(), e.to_string())
        })?;

        let seed_demo = get_bool_env("CAMPUS_SEED_DEMO", true)?;
        let storage = select_storage(
            get_optional_env("CAMPUS_STORAGE").as_deref(),
            get_database_url("CAMPUS_DATABASE_URL"),
            seed_demo,
        )?;

        Ok(Self {
            host,
            port,
            base_url,
            storage,
            auth_rate_limit: get_bool_env("CAMPUS_AUTH_RATE_LIMIT", true)?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for an in-memory server on an ephemeral local port.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            storage: StorageBackend::Memory { seed_demo: false },
            auth_rate_limit: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Resolve the storage backend from `CAMPUS_STORAGE` and the database URL.
fn select_storage(
    requested: Option<&str>,
    database_url: Option<SecretString>,
    seed_demo: bool,
) -> Result<StorageBackend, ConfigError> {
    let (database_url, placeholder) = match database_url {
        Some(url) if is_placeholder(url.expose_secret()) => (None, true),
        other => (other, false),
    };

    match (requested.map(str::trim), database_url) {
        (Some("memory"), _) | (None | Some(""), None) => Ok(StorageBackend::Memory { seed_demo }),
        (Some("postgres") | None | Some(""), Some(database_url)) => {
            Ok(StorageBackend::Postgres { database_url })
        }
        (Some("postgres"), None) if placeholder => Err(ConfigError::PlaceholderEnvVar(
            "CAMPUS_DATABASE_URL".to_string(),
        )),
        (Some("postgres"), None) => Err(ConfigError::MissingEnvVar(
            "CAMPUS_DATABASE_URL".to_string(),
        )),
        (Some(other), _) => Err(ConfigError::InvalidEnvVar(
            "CAMPUS_STORAGE".to_string(),
            format!("expected 'memory' or 'postgres', got '{other}'"),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a boolean environment variable.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| parse_bool(&value).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("expected a boolean, got '{value}'"))
    }))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Whether a configured value is an unfilled template placeholder.
///
/// The whole value is checked, and for URLs also the user, password, host
/// and each path segment, so `postgres://app@todo-db/campus` is a real URL
/// while `postgres://your-user@localhost/db` is not.
fn is_placeholder(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    if is_placeholder_part(&value) {
        return true;
    }

    let Ok(url) = Url::parse(&value) else {
        return false;
    };
    let mut parts = vec![url.username(), url.password().unwrap_or_default()];
    parts.extend(url.host_str());
    parts.extend(url.path_segments().into_iter().flatten());
    parts.into_iter().any(is_placeholder_part)
}

fn is_placeholder_part(part: &str) -> bool {
    PLACEHOLDER_VALUES.contains(&part)
        || PLACEHOLDER_PREFIXES
            .iter()
            .any(|prefix| part.starts_with(prefix))
}
