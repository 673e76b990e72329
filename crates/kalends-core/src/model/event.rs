use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{OwnerId, RecurrenceKind};

pub type EventId = uuid::Uuid;

/// A stored event definition.
///
/// Participant copies are independent definitions with their own id and
/// owner; nothing links them after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: EventId,
    pub owner_id: OwnerId,
    pub description: String,
    pub start_at: DateTime<Utc>,
    /// Display only; never affects which days an event lands on.
    pub stop_at: Option<DateTime<Utc>>,
    pub recurrence: RecurrenceKind,
    pub created_at: DateTime<Utc>,
}

impl EventDefinition {
    #[must_use]
    pub const fn is_single(&self) -> bool {
        !self.recurrence.is_recurring()
    }
}

/// Insert payload for an event definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEventDefinition {
    pub id: EventId,
    pub owner_id: OwnerId,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub stop_at: Option<DateTime<Utc>>,
    pub recurrence: RecurrenceKind,
}

impl NewEventDefinition {
    /// ## Summary
    /// Copies this definition for another owner under a fresh id.
    #[must_use]
    pub fn copy_for(&self, owner_id: OwnerId) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            owner_id,
            ..self.clone()
        }
    }
}

/// Suppresses the single occurrence of `event_id` on the local date
/// `cancel_date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancellationRecord {
    pub event_id: EventId,
    pub cancel_date: NaiveDate,
}
