//! Creating and deleting event definitions.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use kalends_core::model::{EventId, NewEventDefinition, OwnerId, RecurrenceKind, RecurrenceLabel};
use kalends_core::util::datetime::{parse_hhmm, parse_iso_date};

use super::timezone::{ZoneResolver, local_to_utc};
use crate::error::{ServiceError, ServiceResult};
use crate::store::EventStore;

/// Request to create an event, as received from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventInput {
    /// Local date of the first occurrence, `YYYY-MM-DD`.
    pub date: String,
    /// Local start time, `HH:MM`.
    pub start_time: String,
    #[serde(default)]
    pub stop_time: Option<String>,
    pub description: String,
    /// One of `never`, `daily`, `weekly`, `monthly`, `annual`.
    pub recurrent: String,
    /// Owners that receive an independent copy of the event.
    #[serde(default)]
    pub participants: Vec<OwnerId>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub local_date: NaiveDate,
    pub start: NaiveTime,
    pub stop: Option<NaiveTime>,
    pub description: String,
    pub label: RecurrenceLabel,
}

impl CreateEventInput {
    /// ## Summary
    /// Checks every field without touching storage.
    ///
    /// ## Errors
    /// Returns `InvalidInput` for a malformed date or time, a stop time
    /// before the start time, an empty description or an unknown recurrence
    /// token.
    pub fn validate(&self) -> ServiceResult<ValidatedEvent> {
        let local_date = parse_iso_date(&self.date)?;
        let start = parse_hhmm(&self.start_time)?;
        let stop = self.stop_time.as_deref().map(parse_hhmm).transpose()?;
        if stop.is_some_and(|stop| stop < start) {
            return Err(ServiceError::InvalidInput(format!(
                "stop_time {} is before start_time {}",
                self.stop_time.as_deref().unwrap_or_default(),
                self.start_time
            )));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ServiceError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }

        Ok(ValidatedEvent {
            local_date,
            start,
            stop,
            description: description.to_string(),
            label: self.recurrent.parse()?,
        })
    }

    /// Participants other than `creator`, first mention wins.
    fn recipients(&self, creator: OwnerId) -> Vec<OwnerId> {
        let mut recipients: Vec<OwnerId> = Vec::with_capacity(self.participants.len());
        for &participant in &self.participants {
            if participant != creator && !recipients.contains(&participant) {
                recipients.push(participant);
            }
        }
        recipients
    }
}

/// ## Summary
/// Creates the event for `owner_id` and one independent copy for every
/// participant. Returns the id of the creator's copy.
///
/// Instants and recurrence parameters come from the creator's zone and are
/// identical across copies.
///
/// ## Errors
/// Returns `InvalidInput` before any storage access if the input is invalid,
/// `NotFound` if the creator has no profile, and `PartialFanOut` if some
/// copies were stored before a later insert failed.
pub async fn create_event(
    store: &dyn EventStore,
    zones: &ZoneResolver,
    owner_id: OwnerId,
    input: &CreateEventInput,
) -> ServiceResult<EventId> {
    let event = input.validate()?;
    let tz = zones.zone_for_owner(store, owner_id).await?;

    let start_at = local_to_utc(tz, event.local_date.and_time(event.start))?;
    let stop_at = event
        .stop
        .map(|stop| local_to_utc(tz, event.local_date.and_time(stop)))
        .transpose()?;

    let definition = NewEventDefinition {
        id: uuid::Uuid::now_v7(),
        owner_id,
        description: event.description,
        start_at,
        stop_at,
        recurrence: RecurrenceKind::anchored_at(event.label, event.local_date),
    };

    let copies: Vec<NewEventDefinition> = input
        .recipients(owner_id)
        .into_iter()
        .map(|participant| definition.copy_for(participant))
        .collect();
    let requested = copies.len() + 1;

    let id = store.insert_definition(&definition).await?;
    for (persisted, copy) in (1..).zip(&copies) {
        if let Err(source) = store.insert_definition(copy).await {
            tracing::error!(persisted, requested, error = %source, "Participant fan-out failed");
            return Err(ServiceError::PartialFanOut {
                persisted,
                requested,
                source: Box::new(source),
            });
        }
    }

    tracing::info!(event_id = %id, copies = copies.len(), "Created event");
    Ok(id)
}

/// What [`delete_event`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The definition and all its cancellations are gone.
    Deleted,
    /// One occurrence was cancelled; the definition remains.
    Canceled,
}

/// ## Summary
/// Deletes a definition owned by `owner_id`, or cancels one occurrence of it.
///
/// A `date` on a recurring definition cancels the occurrence on that local
/// date. Without a date, or for a one-off event, the definition is deleted.
///
/// ## Errors
/// Returns `InvalidInput` for a malformed date (checked before storage is
/// touched), `NotFound` if the event does not exist or belongs to someone
/// else, or a storage error.
pub async fn delete_event(
    store: &dyn EventStore,
    owner_id: OwnerId,
    event_id: EventId,
    date: Option<&str>,
) -> ServiceResult<DeleteOutcome> {
    let date = date.map(parse_iso_date).transpose()?;

    let definition = store
        .find_definition(owner_id, event_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("event {event_id}")))?;

    match date {
        Some(cancel_date) if definition.recurrence.is_recurring() => {
            store.insert_cancellation(event_id, cancel_date).await?;
            tracing::info!(%event_id, %cancel_date, "Cancelled occurrence");
            Ok(DeleteOutcome::Canceled)
        }
        _ => {
            store.delete_definition(event_id).await?;
            tracing::info!(%event_id, "Deleted event");
            Ok(DeleteOutcome::Deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(date: &str, start: &str, stop: Option<&str>, recurrent: &str) -> CreateEventInput {
        CreateEventInput {
            date: date.to_string(),
            start_time: start.to_string(),
            stop_time: stop.map(str::to_string),
            description: "Standup".to_string(),
            recurrent: recurrent.to_string(),
            participants: Vec::new(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_input() {
        let event = input("2026-01-31", "09:30", Some("10:00"), "monthly")
            .validate()
            .expect("valid");
        assert_eq!(event.local_date, NaiveDate::from_ymd_opt(2026, 1, 31).expect("valid date"));
        assert_eq!(event.label, RecurrenceLabel::Monthly);
        assert_eq!(event.stop, NaiveTime::from_hms_opt(10, 0, 0));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let cases = [
            input("2026-02-30", "09:30", None, "never"),
            input("2026-01-31", "9:30", None, "never"),
            input("2026-01-31", "24:00", None, "never"),
            input("2026-01-31", "09:30", Some("09:00"), "never"),
            input("2026-01-31", "09:30", None, "hourly"),
        ];
        for case in cases {
            assert!(
                matches!(case.validate(), Err(ServiceError::InvalidInput(_))),
                "{case:?} should be rejected"
            );
        }

        let mut blank = input("2026-01-31", "09:30", None, "never");
        blank.description = "   ".to_string();
        assert!(matches!(blank.validate(), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_recipients_skip_creator_and_duplicates() {
        let mut request = input("2026-01-31", "09:30", None, "daily");
        request.participants = vec![7, 1, 9, 7, 1];
        assert_eq!(request.recipients(1), vec![7, 9]);
    }
}
