//! In-memory storage backend.
//!
//! All tables live behind one `RwLock`, so every operation (including the
//! multi-record writes) observes and leaves a consistent state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use campus_events_core::{Email, EventId, UserId};

use super::{EventStore, RepositoryError, StoredCredentials};
use crate::models::{Event, EventApproval, EventQuery, EventRegistration, Profile};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Email, StoredCredentials>,
    profiles: HashMap<UserId, Profile>,
    events: HashMap<EventId, Event>,
    approvals: Vec<EventApproval>,
    registrations: Vec<EventRegistration>,
}

/// Storage backend holding every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub async fn reset(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create_account(
        &self,
        profile: &Profile,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.contains_key(&profile.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        if tables.profiles.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict("profile already exists".to_owned()));
        }

        tables.accounts.insert(
            profile.email.clone(),
            StoredCredentials {
                user_id: profile.id,
                password_hash: password_hash.to_owned(),
            },
        );
        tables.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        Ok(self.tables.read().await.accounts.get(email).cloned())
    }

    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .profiles
            .get_mut(&profile.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = profile.clone();
        Ok(())
    }

    async fn insert_event(
        &self,
        event: &Event,
        approval: &EventApproval,
    ) -> Result<(), RepositoryError> {
        if approval.event_id != event.id {
            return Err(RepositoryError::DataCorruption(
                "approval does not reference the inserted event".to_owned(),
            ));
        }

        let mut tables = self.tables.write().await;
        if tables.events.contains_key(&event.id) {
            return Err(RepositoryError::Conflict("event already exists".to_owned()));
        }
        tables.events.insert(event.id, event.clone());
        tables.approvals.push(approval.clone());
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>, RepositoryError> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .await
            .events
            .values()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();
        query.sort(&mut events);
        Ok(events)
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .events
            .get_mut(&event.id)
            .ok_or(RepositoryError::NotFound)?;

        // Status and ownership only change through their own operations.
        let status = stored.status;
        let organizer_id = stored.organizer_id;
        *stored = event.clone();
        stored.status = status;
        stored.organizer_id = organizer_id;
        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.events.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.approvals.retain(|a| a.event_id != id);
        tables.registrations.retain(|r| r.event_id != id);
        Ok(())
    }

    async fn record_decision(&self, approval: &EventApproval) -> Result<Event, RepositoryError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&approval.event_id)
            .ok_or(RepositoryError::NotFound)?;
        event.status = approval.status;
        event.updated_at = approval.created_at;
        let updated = event.clone();
        tables.approvals.push(approval.clone());
        Ok(updated)
    }

    async fn list_approvals(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventApproval>, RepositoryError> {
        let mut approvals: Vec<EventApproval> = self
            .tables
            .read()
            .await
            .approvals
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        approvals.sort_by_key(|a| a.created_at);
        Ok(approvals)
    }

    async fn insert_registration(
        &self,
        registration: &EventRegistration,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&registration.event_id) {
            return Err(RepositoryError::NotFound);
        }
        if !tables.profiles.contains_key(&registration.user_id) {
            return Err(RepositoryError::NotFound);
        }
        for existing in &tables.registrations {
            if existing.ticket_id == registration.ticket_id {
                return Err(RepositoryError::Conflict("ticket id already exists".to_owned()));
            }
            if existing.event_id == registration.event_id
                && existing.user_id == registration.user_id
            {
                return Err(RepositoryError::Conflict(
                    "user already registered for event".to_owned(),
                ));
            }
        }
        tables.registrations.push(registration.clone());
        Ok(())
    }

    async fn find_registration(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<EventRegistration>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .registrations
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_event_registrations(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventRegistration>, RepositoryError> {
        let mut registrations: Vec<EventRegistration> = self
            .tables
            .read()
            .await
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }

    async fn list_user_registrations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(EventRegistration, Option<Event>)>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(EventRegistration, Option<Event>)> = tables
            .registrations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| (r.clone(), tables.events.get(&r.event_id).cloned()))
            .collect();
        rows.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        Ok(rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use campus_events_core::{EventStatus, Role, TicketId};

    use super::*;
    use crate::models::{EventDraft, NewProfile, RegistrationDetails};

    fn profile(email: &str, role: Role) -> Profile {
        NewProfile {
            name: "Test User".to_owned(),
            role,
            contact: "9876543210".to_owned(),
            department: None,
            year: None,
        }
        .into_profile(UserId::generate(), Email::parse(email).unwrap(), Utc::now())
    }

    fn event(organizer: &Profile) -> Event {
        EventDraft {
            title: "Career Fair".to_owned(),
            description: "Meet recruiters".to_owned(),
            date: NaiveDate::from_ymd_opt(2025, 3, 25).unwrap(),
            time: "9:00 AM".to_owned(),
            location: "Seminar Hall".to_owned(),
            category: "Academic".to_owned(),
            capacity: 300,
            price: None,
            image_url: None,
            organizer_id: organizer.id,
            organizer_name: organizer.name.clone(),
            organizer_contact: None,
        }
        .into_event(Utc::now())
        .unwrap()
    }

    fn registration(event: &Event, user: &Profile, token: &str) -> EventRegistration {
        RegistrationDetails {
            name: user.name.clone(),
            email: user.email.to_string(),
            phone: "1".to_owned(),
            roll_number: "R1".to_owned(),
            department: "CS".to_owned(),
            year: "1".to_owned(),
            special_requirements: None,
        }
        .validate()
        .unwrap()
        .into_registration(
            event.id,
            user.id,
            TicketId::from_parts(&event.id.to_string(), token).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let first = profile("student@example.com", Role::Student);
        store.create_account(&first, "hash").await.unwrap();

        let second = profile("student@example.com", Role::Faculty);
        let err = store.create_account(&second, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(store.get_profile(second.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_event_cascades() {
        let store = MemoryStore::new();
        let faculty = profile("faculty@example.com", Role::Faculty);
        let student = profile("student@example.com", Role::Student);
        store.create_account(&faculty, "hash").await.unwrap();
        store.create_account(&student, "hash").await.unwrap();

        let event = event(&faculty);
        store
            .insert_event(&event, &EventApproval::initial(event.id, Utc::now()))
            .await
            .unwrap();
        store
            .insert_registration(&registration(&event, &student, "AAAAAAAA"))
            .await
            .unwrap();

        store.delete_event(event.id).await.unwrap();

        assert!(store.get_event(event.id).await.unwrap().is_none());
        assert!(store.list_approvals(event.id).await.unwrap().is_empty());
        assert!(store.list_user_registrations(student.id).await.unwrap().is_empty());
        assert!(matches!(
            store.delete_event(event.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_insert_registration_conflicts() {
        let store = MemoryStore::new();
        let faculty = profile("faculty@example.com", Role::Faculty);
        let student = profile("student@example.com", Role::Student);
        let other = profile("other@example.com", Role::Student);
        for p in [&faculty, &student, &other] {
            store.create_account(p, "hash").await.unwrap();
        }
        let event = event(&faculty);
        store
            .insert_event(&event, &EventApproval::initial(event.id, Utc::now()))
            .await
            .unwrap();

        store
            .insert_registration(&registration(&event, &student, "AAAAAAAA"))
            .await
            .unwrap();

        let same_ticket = registration(&event, &other, "AAAAAAAA");
        assert!(matches!(
            store.insert_registration(&same_ticket).await,
            Err(RepositoryError::Conflict(_))
        ));
        let same_user = registration(&event, &student, "BBBBBBBB");
        assert!(matches!(
            store.insert_registration(&same_user).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_record_decision_updates_status_and_trail() {
        let store = MemoryStore::new();
        let faculty = profile("faculty@example.com", Role::Faculty);
        let admin = profile("admin@example.com", Role::Admin);
        let event = event(&faculty);
        store
            .insert_event(&event, &EventApproval::initial(event.id, Utc::now()))
            .await
            .unwrap();

        let decision =
            EventApproval::decision(event.id, admin.id, EventStatus::Approved, None, Utc::now());
        let updated = store.record_decision(&decision).await.unwrap();

        assert_eq!(updated.status, EventStatus::Approved);
        let trail = store.list_approvals(event.id).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].status, EventStatus::Approved);
        assert_eq!(
            store.list_events(EventQuery::approved()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let store = MemoryStore::new();
        let faculty = profile("faculty@example.com", Role::Faculty);
        store.create_account(&faculty, "hash").await.unwrap();
        store.reset().await;
        assert!(store.get_profile(faculty.id).await.unwrap().is_none());
        assert!(
            store
                .get_credentials(&faculty.email)
                .await
                .unwrap()
                .is_none()
        );
    }
}
