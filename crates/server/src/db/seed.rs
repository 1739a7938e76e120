//! Demo data: three accounts (one per role) and three approved events.
//!
//! Seeding is idempotent: existing accounts are kept and events are only
//! added to an empty store.

use chrono::NaiveDate;

use campus_events_core::{EventStatus, Role};

use super::EventStore;
use crate::models::{EventDraft, NewProfile, Profile};
use crate::services::events::{EventError, EventService};
use crate::services::identity::{AuthError, IdentityService};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password";

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seeding accounts failed: {0}")]
    Account(#[from] AuthError),

    #[error("seeding events failed: {0}")]
    Event(#[from] EventError),

    #[error("demo account {0} exists but could not be signed in")]
    MissingAccount(&'static str),
}

/// What a seeding run added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub accounts: usize,
    pub events: usize,
}

struct DemoAccount {
    email: &'static str,
    name: &'static str,
    role: Role,
    contact: &'static str,
    department: Option<&'static str>,
    year: Option<&'static str>,
}

const ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "student@example.com",
        name: "John Student",
        role: Role::Student,
        contact: "9876543210",
        department: Some("Computer Science"),
        year: Some("Third Year"),
    },
    DemoAccount {
        email: "faculty@example.com",
        name: "Jane Faculty",
        role: Role::Faculty,
        contact: "9876543211",
        department: Some("Computer Science"),
        year: None,
    },
    DemoAccount {
        email: "admin@example.com",
        name: "Admin User",
        role: Role::Admin,
        contact: "9876543212",
        department: None,
        year: None,
    },
];

struct DemoEvent {
    title: &'static str,
    description: &'static str,
    date: (i32, u32, u32),
    time: &'static str,
    location: &'static str,
    category: &'static str,
    capacity: i32,
    price: &'static str,
    organizer_name: &'static str,
}

const EVENTS: [DemoEvent; 3] = [
    DemoEvent {
        title: "Tech Symposium 2025",
        description: "Annual technology symposium featuring talks from industry experts, \
                      project showcases and networking sessions.",
        date: (2025, 3, 15),
        time: "10:00 AM",
        location: "Main Auditorium",
        category: "Technical",
        capacity: 200,
        price: "Free",
        organizer_name: "Dr. Sarah Johnson",
    },
    DemoEvent {
        title: "Cultural Fest",
        description: "A celebration of diverse cultures through music, dance, art and food.",
        date: (2025, 3, 20),
        time: "11:30 AM",
        location: "College Ground",
        category: "Cultural",
        capacity: 500,
        price: "₹100",
        organizer_name: "Prof. Michael Chen",
    },
    DemoEvent {
        title: "Career Fair",
        description: "Connect with potential employers and explore internship and job \
                      opportunities across industries.",
        date: (2025, 3, 25),
        time: "9:00 AM",
        location: "Seminar Hall",
        category: "Academic",
        capacity: 300,
        price: "Free",
        organizer_name: "Dr. Emily Rodriguez",
    },
];

/// Seed the demo accounts and events into `store`.
///
/// # Errors
///
/// Returns `SeedError` if an account or event cannot be written.
pub async fn seed_demo_data(store: &dyn EventStore) -> Result<SeedReport, SeedError> {
    let identity = IdentityService::new(store);
    let events = EventService::new(store);
    let mut report = SeedReport::default();

    let mut faculty: Option<Profile> = None;
    let mut admin: Option<Profile> = None;

    for account in &ACCOUNTS {
        let profile = NewProfile {
            name: account.name.to_owned(),
            role: account.role,
            contact: account.contact.to_owned(),
            department: account.department.map(ToOwned::to_owned),
            year: account.year.map(ToOwned::to_owned),
        };

        let profile = match identity
            .sign_up(account.email, DEMO_PASSWORD, profile)
            .await
        {
            Ok(profile) => {
                report.accounts += 1;
                profile
            }
            Err(AuthError::UserAlreadyExists) => identity
                .sign_in(account.email, DEMO_PASSWORD)
                .await
                .map_err(|_| SeedError::MissingAccount(account.email))?,
            Err(e) => return Err(e.into()),
        };

        match profile.role {
            Role::Faculty => faculty = Some(profile),
            Role::Admin => admin = Some(profile),
            Role::Student => {}
        }
    }

    if !events.list_all_events().await?.is_empty() {
        tracing::info!(?report, "Events already present, skipping demo events");
        return Ok(report);
    }

    let faculty = faculty.ok_or(SeedError::MissingAccount("faculty@example.com"))?;
    let admin = admin.ok_or(SeedError::MissingAccount("admin@example.com"))?;

    for demo in &EVENTS {
        let (year, month, day) = demo.date;
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };

        let event = events
            .create_event(EventDraft {
                title: demo.title.to_owned(),
                description: demo.description.to_owned(),
                date,
                time: demo.time.to_owned(),
                location: demo.location.to_owned(),
                category: demo.category.to_owned(),
                capacity: demo.capacity,
                price: Some(demo.price.to_owned()),
                image_url: None,
                organizer_id: faculty.id,
                organizer_name: demo.organizer_name.to_owned(),
                organizer_contact: Some(faculty.contact.clone()),
            })
            .await?;
        events
            .set_event_status(event.id, EventStatus::Approved, &admin, None)
            .await?;
        report.events += 1;
    }

    tracing::info!(?report, "Demo data seeded");
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();

        let first = seed_demo_data(&store).await.unwrap();
        assert_eq!(first, SeedReport { accounts: 3, events: 3 });

        let second = seed_demo_data(&store).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let approved = EventService::new(&store).list_approved_events().await.unwrap();
        let titles: Vec<&str> = approved.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Tech Symposium 2025", "Cultural Fest", "Career Fair"]);
    }
}
