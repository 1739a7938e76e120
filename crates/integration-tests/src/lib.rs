//! Integration tests for Campus Events.
//!
//! Each test spawns the full router in-process on an ephemeral port, over a
//! fresh memory store seeded with the demo accounts and events, and drives
//! it with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p campus-events-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, Response, StatusCode, header};
use serde_json::Value;

use campus_events_server::config::ServerConfig;
use campus_events_server::db::seed::{DEMO_PASSWORD, seed_demo_data};
use campus_events_server::db::{EventStore, MemoryStore};
use campus_events_server::state::AppState;

pub const STUDENT_EMAIL: &str = "student@example.com";
pub const FACULTY_EMAIL: &str = "faculty@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// A running server.
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Spawn a server over a freshly seeded memory store.
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_demo_data(store.as_ref())
            .await
            .expect("Failed to seed demo data");

        let config = ServerConfig::in_memory();
        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to read local address");

        let shared: Arc<dyn EventStore> = store.clone();
        let app = campus_events_server::app(
            AppState::new(config, shared),
            tower_sessions::MemoryStore::default(),
        );
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            store,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client with its own cookie jar that does not follow redirects.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Sign in with `email` and the demo password, returning the client
    /// that holds the session.
    pub async fn sign_in(&self, email: &str) -> Client {
        self.sign_in_with(email, DEMO_PASSWORD).await
    }

    pub async fn sign_in_with(&self, email: &str, password: &str) -> Client {
        let client = Self::client();
        let resp = client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Failed to send login request");
        assert!(
            resp.status().is_redirection(),
            "login for {email} failed: {}",
            resp.status()
        );
        client
    }

    /// Id of the first approved event with `title`.
    pub async fn approved_event_id(&self, title: &str) -> String {
        let events: Value = Self::client()
            .get(self.url("/events"))
            .send()
            .await
            .expect("Failed to list events")
            .json()
            .await
            .expect("Invalid events JSON");

        events["events"]
            .as_array()
            .and_then(|list| list.iter().find(|e| e["title"] == title))
            .and_then(|e| e["id"].as_str())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| panic!("no approved event titled {title}"))
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Assert `resp` redirects to exactly `path`.
pub fn assert_redirects_to(resp: &Response, path: &str) {
    assert!(
        resp.status().is_redirection(),
        "expected redirect, got {}",
        resp.status()
    );
    assert_eq!(location(resp), Some(path));
}

/// Assert `resp` has `status`.
pub fn assert_status(resp: &Response, status: StatusCode) {
    assert_eq!(resp.status(), status, "unexpected status for {}", resp.url());
}
