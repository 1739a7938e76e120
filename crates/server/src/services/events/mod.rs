//! Event repository service.
//!
//! Event CRUD, the approval workflow and ticketed registration, written
//! against [`EventStore`] so it runs unchanged over either backend.

mod error;

pub use error::EventError;

use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde::Serialize;

use campus_events_core::{EventId, EventStatus, Role, TicketId, UserId};

use crate::db::{EventStore, RepositoryError};
use crate::models::{
    Event, EventApproval, EventDraft, EventFilter, EventPatch, EventQuery, EventRegistration,
    Profile, RegistrationDetails, UserRegistration, timestamp,
};

/// Ticket generation attempts before giving up on collisions.
const MAX_TICKET_ATTEMPTS: usize = 5;

/// An approved event with its listing tags.
#[derive(Debug, Clone, Serialize)]
pub struct EventListing {
    #[serde(flatten)]
    pub event: Event,
    pub tags: Vec<String>,
}

/// Event repository service.
pub struct EventService<'a> {
    store: &'a dyn EventStore,
}

impl<'a> EventService<'a> {
    /// Create a new event service.
    #[must_use]
    pub const fn new(store: &'a dyn EventStore) -> Self {
        Self { store }
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Approved events, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn list_approved_events(&self) -> Result<Vec<Event>, EventError> {
        self.list(EventQuery::approved()).await
    }

    /// Approved events matching `filter`, tagged relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn browse_events(
        &self,
        filter: &EventFilter,
        today: NaiveDate,
    ) -> Result<Vec<EventListing>, EventError> {
        Ok(self
            .list_approved_events()
            .await?
            .into_iter()
            .filter(|event| filter.matches(event))
            .map(|event| EventListing {
                tags: event.tags(today),
                event,
            })
            .collect())
    }

    /// Events organized by `organizer_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn list_faculty_events(&self, organizer_id: UserId) -> Result<Vec<Event>, EventError> {
        self.list(EventQuery::organized_by(organizer_id)).await
    }

    /// Every event regardless of status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn list_all_events(&self) -> Result<Vec<Event>, EventError> {
        self.list(EventQuery::all()).await
    }

    /// Events awaiting a decision, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn list_pending_events(&self) -> Result<Vec<Event>, EventError> {
        self.list(EventQuery::with_status(EventStatus::Pending))
            .await
    }

    async fn list(&self, query: EventQuery) -> Result<Vec<Event>, EventError> {
        self.store.list_events(query).await.map_err(|e| {
            tracing::error!(error = %e, ?query, "Failed to list events");
            EventError::Repository(e)
        })
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Get a single event.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    pub async fn get_event(&self, id: EventId) -> Result<Event, EventError> {
        self.store
            .get_event(id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event_id = %id, "Failed to load event");
                EventError::Repository(e)
            })?
            .ok_or(EventError::NotFound)
    }

    /// Create a `pending` event and its initial approval record.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Validation` if the draft is invalid.
    /// Returns `EventError::Repository` if the store fails.
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event, EventError> {
        let now = timestamp();
        let event = draft.into_event(now)?;
        let approval = EventApproval::initial(event.id, now);

        self.store
            .insert_event(&event, &approval)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create event");
                EventError::Repository(e)
            })?;

        tracing::info!(event_id = %event.id, organizer = %event.organizer_id, "Event created");
        Ok(event)
    }

    /// Apply `patch` to an event owned by `actor` (or any event for an admin).
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    /// Returns `EventError::Forbidden` if `actor` may not edit it.
    /// Returns `EventError::Validation` if the patch is invalid.
    pub async fn update_event(
        &self,
        id: EventId,
        patch: &EventPatch,
        actor: &Profile,
    ) -> Result<Event, EventError> {
        let mut event = self.get_event(id).await?;
        ensure_can_manage(&event, actor)?;

        patch.apply(&mut event, timestamp())?;
        self.store.update_event(&event).await.map_err(|e| match e {
            RepositoryError::NotFound => EventError::NotFound,
            other => {
                tracing::error!(error = %other, event_id = %id, "Failed to update event");
                EventError::Repository(other)
            }
        })?;

        tracing::info!(event_id = %id, actor = %actor.id, "Event updated");
        Ok(event)
    }

    /// Delete an event along with its registrations and approvals.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    /// Returns `EventError::Forbidden` if `actor` may not delete it.
    /// Returns `EventError::DeleteFailed` if the store fails.
    pub async fn delete_event(&self, id: EventId, actor: &Profile) -> Result<(), EventError> {
        let event = self.get_event(id).await?;
        ensure_can_manage(&event, actor)?;

        self.store.delete_event(id).await.map_err(|e| match e {
            RepositoryError::NotFound => EventError::NotFound,
            other => {
                tracing::error!(error = %other, event_id = %id, "Failed to delete event");
                EventError::DeleteFailed(other)
            }
        })?;

        tracing::info!(event_id = %id, actor = %actor.id, "Event deleted");
        Ok(())
    }

    // =========================================================================
    // Approvals
    // =========================================================================

    /// Record an admin decision and move the event to `status`.
    ///
    /// Re-applying the current decision is accepted and recorded again.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Forbidden` if `admin` is not an admin.
    /// Returns `EventError::NotFound` if the event does not exist.
    /// Returns `EventError::InvalidTransition` for a move back to `pending`.
    /// Returns `EventError::StatusUpdateFailed` if the store fails.
    pub async fn set_event_status(
        &self,
        event_id: EventId,
        status: EventStatus,
        admin: &Profile,
        comment: Option<String>,
    ) -> Result<Event, EventError> {
        if admin.role != Role::Admin {
            return Err(EventError::Forbidden);
        }

        let event = self.get_event(event_id).await?;
        let next = event.status.transition(status)?;

        let approval = EventApproval::decision(event_id, admin.id, next, comment, timestamp());
        let updated = self
            .store
            .record_decision(&approval)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => EventError::NotFound,
                other => {
                    tracing::error!(error = %other, %event_id, "Failed to update event status");
                    EventError::StatusUpdateFailed(other)
                }
            })?;

        tracing::info!(
            %event_id,
            from = %event.status,
            to = %updated.status,
            admin = %admin.id,
            "Event status changed"
        );
        Ok(updated)
    }

    /// Approval trail for an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    pub async fn list_event_approvals(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventApproval>, EventError> {
        self.get_event(event_id).await?;
        Ok(self.store.list_approvals(event_id).await?)
    }

    // =========================================================================
    // Registrations
    // =========================================================================

    /// Register `user_id` for an approved event and issue a ticket.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    /// Returns `EventError::NotOpenForRegistration` if it is not approved.
    /// Returns `EventError::AlreadyRegistered` for a second registration.
    /// Returns `EventError::Validation` if a required detail is missing.
    /// Returns `EventError::RegistrationFailed` if the store fails.
    pub async fn register_for_event(
        &self,
        event_id: EventId,
        user_id: UserId,
        details: &RegistrationDetails,
    ) -> Result<EventRegistration, EventError> {
        let event = self.get_event(event_id).await?;
        if event.status != EventStatus::Approved {
            return Err(EventError::NotOpenForRegistration);
        }
        if self.is_registered(event_id, user_id).await? {
            return Err(EventError::AlreadyRegistered);
        }
        let details = details.validate()?;

        for attempt in 1..=MAX_TICKET_ATTEMPTS {
            let ticket_id = generate_ticket_id(event_id).map_err(|e| {
                EventError::RegistrationFailed(RepositoryError::DataCorruption(e.to_string()))
            })?;
            let registration =
                details
                    .clone()
                    .into_registration(event_id, user_id, ticket_id, timestamp());

            match self.store.insert_registration(&registration).await {
                Ok(()) => {
                    tracing::info!(
                        %event_id,
                        %user_id,
                        ticket_id = %registration.ticket_id,
                        "Registration confirmed"
                    );
                    return Ok(registration);
                }
                Err(RepositoryError::Conflict(_)) => {
                    if self.is_registered(event_id, user_id).await? {
                        return Err(EventError::AlreadyRegistered);
                    }
                    tracing::warn!(%event_id, attempt, "Ticket id collision, regenerating");
                }
                Err(RepositoryError::NotFound) => return Err(EventError::NotFound),
                Err(e) => {
                    tracing::error!(error = %e, %event_id, %user_id, "Failed to register");
                    return Err(EventError::RegistrationFailed(e));
                }
            }
        }

        tracing::error!(%event_id, "Gave up issuing a unique ticket id");
        Err(EventError::RegistrationFailed(RepositoryError::Conflict(
            "could not issue a unique ticket id".to_owned(),
        )))
    }

    async fn is_registered(&self, event_id: EventId, user_id: UserId) -> Result<bool, EventError> {
        self.store
            .find_registration(event_id, user_id)
            .await
            .map(|r| r.is_some())
            .map_err(|e| {
                tracing::error!(error = %e, %event_id, %user_id, "Failed to check registration");
                EventError::RegistrationFailed(e)
            })
    }

    /// A user's registrations with their events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn list_user_registrations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserRegistration>, EventError> {
        let rows = self
            .store
            .list_user_registrations(user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %user_id, "Failed to list registrations");
                EventError::Repository(e)
            })?;

        Ok(join_with_events(rows, Utc::now()))
    }

    /// Registrations for an event managed by `actor`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    /// Returns `EventError::Forbidden` unless `actor` organizes it or is an
    /// admin.
    pub async fn list_managed_event_registrations(
        &self,
        event_id: EventId,
        actor: &Profile,
    ) -> Result<Vec<EventRegistration>, EventError> {
        let event = self.get_event(event_id).await?;
        ensure_can_manage(&event, actor)?;
        self.list_event_registrations(event_id).await
    }

    /// Registrations for an event, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Repository` if the store fails.
    pub async fn list_event_registrations(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventRegistration>, EventError> {
        self.store
            .list_event_registrations(event_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %event_id, "Failed to list event registrations");
                EventError::Repository(e)
            })
    }
}

/// Only the organizer or an admin manages an event.
fn ensure_can_manage(event: &Event, actor: &Profile) -> Result<(), EventError> {
    if actor.role == Role::Admin || event.is_organized_by(actor.id) {
        Ok(())
    } else {
        Err(EventError::Forbidden)
    }
}

/// Generate a ticket id from the event id and a fresh random token.
fn generate_ticket_id(event_id: EventId) -> Result<TicketId, campus_events_core::TicketIdError> {
    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(TicketId::TOKEN_LEN)
        .map(char::from)
        .collect();
    TicketId::from_parts(&event_id.to_string(), &token)
}

/// Pair registrations with their events, substituting a placeholder for
/// events that no longer exist.
fn join_with_events(
    rows: Vec<(EventRegistration, Option<Event>)>,
    now: DateTime<Utc>,
) -> Vec<UserRegistration> {
    rows.into_iter()
        .map(|(registration, event)| {
            let event = event.unwrap_or_else(|| {
                tracing::warn!(
                    event_id = %registration.event_id,
                    registration_id = %registration.id,
                    "Registration references a missing event"
                );
                Event::placeholder(registration.event_id, now)
            });
            UserRegistration {
                registration,
                event,
            }
        })
        .collect()
}
