//! Event approval audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_events_core::{ApprovalId, EventId, EventStatus, UserId};

/// One entry in an event's approval trail.
///
/// Records are append-only. The newest record's status always equals the
/// event's own status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventApproval {
    pub id: ApprovalId,
    pub event_id: EventId,
    /// The deciding admin; `None` for the record written at creation.
    pub admin_id: Option<UserId>,
    pub status: EventStatus,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventApproval {
    /// The pending record written alongside a new event.
    #[must_use]
    pub fn initial(event_id: EventId, now: DateTime<Utc>) -> Self {
        Self {
            id: ApprovalId::generate(),
            event_id,
            admin_id: None,
            status: EventStatus::Pending,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// An admin decision.
    #[must_use]
    pub fn decision(
        event_id: EventId,
        admin_id: UserId,
        status: EventStatus,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApprovalId::generate(),
            event_id,
            admin_id: Some(admin_id),
            status,
            comment: super::optional(comment.as_deref()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_is_pending_without_admin() {
        let approval = EventApproval::initial(EventId::generate(), Utc::now());
        assert_eq!(approval.status, EventStatus::Pending);
        assert_eq!(approval.admin_id, None);
    }

    #[test]
    fn test_decision_blanks_empty_comment() {
        let admin = UserId::generate();
        let approval = EventApproval::decision(
            EventId::generate(),
            admin,
            EventStatus::Rejected,
            Some("  ".to_owned()),
            Utc::now(),
        );
        assert_eq!(approval.admin_id, Some(admin));
        assert_eq!(approval.comment, None);
    }
}
