//! Home and informational pages.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::models::event::{ALL_CATEGORIES, CATEGORIES};
use crate::models::EventFilter;
use crate::services::events::EventListing;
use crate::state::AppState;

/// Approved events featured on the home page.
const FEATURED_EVENTS: usize = 3;

/// Home page.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured: Vec<EventListing>,
    pub categories: Vec<&'static str>,
}

/// A static informational page.
#[derive(Debug, Serialize)]
pub struct InfoPage {
    pub title: &'static str,
    pub sections: &'static [Section],
}

#[derive(Debug, Serialize)]
pub struct Section {
    pub heading: &'static str,
    pub body: &'static str,
}

/// Home page: the next few approved events.
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePage>> {
    let today = Utc::now().date_naive();
    let featured = state
        .events()
        .browse_events(&EventFilter::default(), today)
        .await?
        .into_iter()
        .filter(|listing| listing.event.date >= today)
        .take(FEATURED_EVENTS)
        .collect();

    Ok(Json(HomePage {
        featured,
        categories: std::iter::once(ALL_CATEGORIES)
            .chain(CATEGORIES.iter().copied())
            .collect(),
    }))
}

pub async fn features() -> Json<InfoPage> {
    Json(InfoPage {
        title: "Features",
        sections: &[
            Section {
                heading: "Roles",
                body: "Students register, faculty organize, admins approve.",
            },
            Section {
                heading: "Event discovery",
                body: "Browse approved events by category or search by title and description.",
            },
            Section {
                heading: "Approval workflow",
                body: "Every new event waits for an admin decision before it is listed.",
            },
            Section {
                heading: "Ticketed registration",
                body: "Each registration is issued a unique ticket id.",
            },
        ],
    })
}

pub async fn about() -> Json<InfoPage> {
    Json(InfoPage {
        title: "About",
        sections: &[Section {
            heading: "Mission",
            body: "One place for the campus community to find, run and attend events.",
        }],
    })
}

pub async fn contact() -> Json<InfoPage> {
    Json(InfoPage {
        title: "Contact",
        sections: &[
            Section {
                heading: "Registering for an event",
                body: "Sign in, open an approved event and submit the registration form.",
            },
            Section {
                heading: "Organizing an event",
                body: "Faculty accounts can submit events from their dashboard for approval.",
            },
        ],
    })
}
