//! `PostgreSQL` storage backend.
//!
//! Multi-statement writes run inside a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use campus_events_core::{Email, EventId, UserId};

use super::{EventStore, RepositoryError, StoredCredentials};
use crate::models::{Event, EventApproval, EventOrder, EventQuery, EventRegistration, Profile};

const EVENT_COLUMNS: &str = "id, title, description, date, time, location, category, capacity, \
     price, image_url, organizer_id, organizer_name, organizer_contact, status, created_at, \
     updated_at";

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, name, email, phone, roll_number, \
     department, year, special_requirements, ticket_id, status, created_at, updated_at";

/// Storage backend over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique or foreign-key violation onto the matching repository error.
fn map_constraint(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_account(
        &self,
        profile: &Profile,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO profiles (id, name, email, role, contact, department, year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role)
        .bind(&profile.contact)
        .bind(&profile.department)
        .bind(&profile.year)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint(e, "email already exists"))?;

        sqlx::query("INSERT INTO accounts (user_id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(profile.id)
            .bind(&profile.email)
            .bind(password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_constraint(e, "email already exists"))?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row: Option<(UserId, String)> =
            sqlx::query_as("SELECT user_id, password_hash FROM accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(user_id, password_hash)| StoredCredentials {
            user_id,
            password_hash,
        }))
    }

    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            SELECT id, name, email, role, contact, department, year, created_at, updated_at
            FROM profiles
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE profiles
            SET name = $2, role = $3, contact = $4, department = $5, year = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(profile.role)
        .bind(&profile.contact)
        .bind(&profile.department)
        .bind(&profile.year)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn insert_event(
        &self,
        event: &Event,
        approval: &EventApproval,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO events ({EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.capacity)
        .bind(&event.price)
        .bind(&event.image_url)
        .bind(event.organizer_id)
        .bind(&event.organizer_name)
        .bind(&event.organizer_contact)
        .bind(event.status)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint(e, "event already exists"))?;

        insert_approval(&mut tx, approval).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>, RepositoryError> {
        let order = match query.order {
            EventOrder::DateAscending => "date ASC, created_at ASC",
            EventOrder::NewestFirst => "created_at DESC",
        };

        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::event_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR organizer_id = $2) \
             ORDER BY {order}"
        ))
        .bind(query.status)
        .bind(query.organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE events
            SET title = $2, description = $3, date = $4, time = $5, location = $6,
                category = $7, capacity = $8, price = $9, image_url = $10,
                organizer_contact = $11, updated_at = $12
            WHERE id = $1
            ",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.capacity)
        .bind(&event.price)
        .bind(&event.image_url)
        .bind(&event.organizer_contact)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> Result<(), RepositoryError> {
        // Approvals and registrations go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn record_decision(&self, approval: &EventApproval) -> Result<Event, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET status = $2, updated_at = $3 WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(approval.event_id)
        .bind(approval.status)
        .bind(approval.created_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        insert_approval(&mut tx, approval).await?;

        tx.commit().await?;
        Ok(event)
    }

    async fn list_approvals(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventApproval>, RepositoryError> {
        let approvals = sqlx::query_as::<_, EventApproval>(
            r"
            SELECT id, event_id, admin_id, status, comment, created_at, updated_at
            FROM event_approvals
            WHERE event_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(approvals)
    }

    async fn insert_registration(
        &self,
        registration: &EventRegistration,
    ) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT INTO event_registrations ({REGISTRATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(registration.id)
        .bind(registration.event_id)
        .bind(registration.user_id)
        .bind(&registration.name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(&registration.roll_number)
        .bind(&registration.department)
        .bind(&registration.year)
        .bind(&registration.special_requirements)
        .bind(&registration.ticket_id)
        .bind(registration.status)
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "registration already exists"))?;

        Ok(())
    }

    async fn find_registration(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<EventRegistration>, RepositoryError> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations \
             WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    async fn list_event_registrations(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventRegistration>, RepositoryError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations \
             WHERE event_id = $1 ORDER BY created_at DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    async fn list_user_registrations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(EventRegistration, Option<Event>)>, RepositoryError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let event_ids: Vec<uuid::Uuid> = registrations
            .iter()
            .map(|r| r.event_id.as_uuid())
            .collect();

        let mut events: HashMap<EventId, Event> = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)"
        ))
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|event| (event.id, event))
        .collect();

        // One registration per (event, user), so each event is taken once.
        Ok(registrations
            .into_iter()
            .map(|r| {
                let event = events.remove(&r.event_id);
                (r, event)
            })
            .collect())
    }
}

async fn insert_approval(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    approval: &EventApproval,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO event_approvals (id, event_id, admin_id, status, comment, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(approval.id)
    .bind(approval.event_id)
    .bind(approval.admin_id)
    .bind(approval.status)
    .bind(&approval.comment)
    .bind(approval.created_at)
    .bind(approval.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_constraint(e, "approval already exists"))?;

    Ok(())
}
