//! Event domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use campus_events_core::{EventId, EventStatus, UserId};

use super::{ValidationError, optional, required};

/// Price label used when none is given.
pub const FREE_PRICE: &str = "Free";

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All Events";

/// Categories offered by the event forms.
pub const CATEGORIES: &[&str] = &[
    "Academic",
    "Cultural",
    "Sports",
    "Technical",
    "Workshop",
    "Seminar",
];

/// A campus event (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Start time as entered by the organizer, e.g. "10:00 AM".
    pub time: String,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    /// Free-text price label, e.g. "Free" or "₹100".
    pub price: String,
    pub image_url: Option<String>,
    pub organizer_id: UserId,
    pub organizer_name: String,
    pub organizer_contact: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Stand-in for an event a registration points at but the store no
    /// longer has.
    #[must_use]
    pub fn placeholder(id: EventId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: "Unknown Event".to_owned(),
            description: "Event details not available".to_owned(),
            date: now.date_naive(),
            time: "12:00 PM".to_owned(),
            location: "Unknown".to_owned(),
            category: "Other".to_owned(),
            capacity: 0,
            price: FREE_PRICE.to_owned(),
            image_url: None,
            organizer_id: UserId::new(campus_events_core::NIL_UUID),
            organizer_name: "Unknown".to_owned(),
            organizer_contact: None,
            status: EventStatus::Approved,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the price label means the event costs nothing.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.price.trim().eq_ignore_ascii_case(FREE_PRICE)
    }

    /// Listing tags: the category, `Free`/`Paid`, and `Past`/`Today`/`Upcoming`.
    #[must_use]
    pub fn tags(&self, today: NaiveDate) -> Vec<String> {
        let cost = if self.is_free() { "Free" } else { "Paid" };
        let when = match self.date.cmp(&today) {
            std::cmp::Ordering::Less => "Past",
            std::cmp::Ordering::Equal => "Today",
            std::cmp::Ordering::Greater => "Upcoming",
        };
        vec![self.category.clone(), cost.to_owned(), when.to_owned()]
    }

    /// Whether `user_id` organizes this event.
    #[must_use]
    pub fn is_organized_by(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }
}

/// Input for creating an event.
///
/// The organizer fields are filled from the creating faculty profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub organizer_id: UserId,
    pub organizer_name: String,
    pub organizer_contact: Option<String>,
}

impl EventDraft {
    /// Validate the draft and build a `pending` event from it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for blank required text or a non-positive
    /// capacity.
    pub fn into_event(self, now: DateTime<Utc>) -> Result<Event, ValidationError> {
        if self.capacity <= 0 {
            return Err(ValidationError::new("capacity", "must be a positive number"));
        }

        Ok(Event {
            id: EventId::generate(),
            title: required("title", &self.title)?,
            description: required("description", &self.description)?,
            date: self.date,
            time: required("time", &self.time)?,
            location: required("location", &self.location)?,
            category: required("category", &self.category)?,
            capacity: self.capacity,
            price: optional(self.price.as_deref()).unwrap_or_else(|| FREE_PRICE.to_owned()),
            image_url: optional(self.image_url.as_deref()),
            organizer_id: self.organizer_id,
            organizer_name: required("organizer_name", &self.organizer_name)?,
            organizer_contact: optional(self.organizer_contact.as_deref()),
            status: EventStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial event update.
///
/// `id`, `status` and `organizer_id` are deliberately absent: status only
/// changes through an approval, and ownership never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: Option<i32>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub organizer_contact: Option<String>,
}

impl EventPatch {
    /// Apply the patch, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a supplied required field is blank or the
    /// capacity is not positive.
    pub fn apply(&self, event: &mut Event, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            event.title = required("title", title)?;
        }
        if let Some(description) = &self.description {
            event.description = required("description", description)?;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = &self.time {
            event.time = required("time", time)?;
        }
        if let Some(location) = &self.location {
            event.location = required("location", location)?;
        }
        if let Some(category) = &self.category {
            event.category = required("category", category)?;
        }
        if let Some(capacity) = self.capacity {
            if capacity <= 0 {
                return Err(ValidationError::new("capacity", "must be a positive number"));
            }
            event.capacity = capacity;
        }
        if let Some(price) = &self.price {
            event.price = optional(Some(price)).unwrap_or_else(|| FREE_PRICE.to_owned());
        }
        if self.image_url.is_some() {
            event.image_url = optional(self.image_url.as_deref());
        }
        if self.organizer_contact.is_some() {
            event.organizer_contact = optional(self.organizer_contact.as_deref());
        }
        event.updated_at = now;
        Ok(())
    }
}

/// Sort order for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrder {
    /// Soonest event first (public listing).
    DateAscending,
    /// Most recently created first (dashboards).
    #[default]
    NewestFirst,
}

/// Store-level event selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub organizer_id: Option<UserId>,
    pub order: EventOrder,
}

impl EventQuery {
    /// Approved events, soonest first.
    #[must_use]
    pub const fn approved() -> Self {
        Self {
            status: Some(EventStatus::Approved),
            organizer_id: None,
            order: EventOrder::DateAscending,
        }
    }

    /// Events with the given status, newest first.
    #[must_use]
    pub const fn with_status(status: EventStatus) -> Self {
        Self {
            status: Some(status),
            organizer_id: None,
            order: EventOrder::NewestFirst,
        }
    }

    /// Events organized by `organizer_id`, newest first.
    #[must_use]
    pub const fn organized_by(organizer_id: UserId) -> Self {
        Self {
            status: None,
            organizer_id: Some(organizer_id),
            order: EventOrder::NewestFirst,
        }
    }

    /// Every event, newest first.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            status: None,
            organizer_id: None,
            order: EventOrder::NewestFirst,
        }
    }

    /// Whether `event` is selected by this query.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.status.is_none_or(|status| event.status == status)
            && self
                .organizer_id
                .is_none_or(|organizer| event.organizer_id == organizer)
    }

    /// Sort `events` in this query's order.
    pub fn sort(&self, events: &mut [Event]) {
        match self.order {
            EventOrder::DateAscending => events.sort_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then_with(|| a.created_at.cmp(&b.created_at))
            }),
            EventOrder::NewestFirst => events.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

/// Public browsing filter over approved events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventFilter {
    /// Exact category; absent or `"All Events"` matches everything.
    pub category: Option<String>,
    /// Case-insensitive substring of the title or description.
    #[serde(rename = "q")]
    pub search: Option<String>,
}

impl EventFilter {
    /// Whether `event` passes the filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let category_ok = match self.category.as_deref().map(str::trim) {
            None | Some("" | ALL_CATEGORIES) => true,
            Some(category) => event.category == category,
        };

        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                event.title.to_lowercase().contains(&query)
                    || event.description.to_lowercase().contains(&query)
            }
        };

        category_ok && search_ok
    }
}
