//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::EventStore;
use crate::services::events::EventService;
use crate::services::identity::IdentityService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// injected storage backend and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn EventStore>,
}

impl AppState {
    /// Create a new application state over `store`.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn EventStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn store(&self) -> &dyn EventStore {
        self.inner.store.as_ref()
    }

    /// Event repository over the configured store.
    #[must_use]
    pub fn events(&self) -> EventService<'_> {
        EventService::new(self.store())
    }

    /// Identity service over the configured store.
    #[must_use]
    pub fn identity(&self) -> IdentityService<'_> {
        IdentityService::new(self.store())
    }
}
