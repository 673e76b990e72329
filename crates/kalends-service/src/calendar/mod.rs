//! The calendar engine.
//!
//! Queries resolve the owner's zone, turn the requested local range into a
//! UTC window, fetch candidate definitions and their cancellations from the
//! store, then decide membership per local day with [`classify::classify`].

pub mod cancellation;
pub mod candidate;
pub mod classify;
pub mod day;
pub mod due;
pub mod event;
pub mod month;
pub mod timezone;
pub mod upcoming;
pub mod window;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use kalends_core::constants::{UPCOMING_DAYS, UPCOMING_LIMIT};
use kalends_core::model::{DueOccurrence, EventId, Occurrence, OwnerId};
use kalends_core::util::datetime::{checked_date, first_of_month};

pub use event::{CreateEventInput, DeleteOutcome};
pub use month::MonthCounts;
pub use timezone::ZoneResolver;

use crate::error::ServiceResult;
use crate::store::EventStore;

/// Entry point bundling a store with the zone resolver.
#[derive(Clone)]
pub struct CalendarService {
    store: Arc<dyn EventStore>,
    zones: ZoneResolver,
}

impl CalendarService {
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, zones: ZoneResolver) -> Self {
        Self { store, zones }
    }

    #[must_use]
    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }

    /// ## Summary
    /// Per-day occurrence counts for a month in the owner's zone.
    ///
    /// ## Errors
    /// `InvalidInput` for an out-of-range year or month, `NotFound` if the
    /// owner has no profile, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn month(&self, owner_id: OwnerId, year: i32, month: u32) -> ServiceResult<MonthCounts> {
        let first = first_of_month(year, month)?;
        let tz = self.zones.zone_for_owner(self.store(), owner_id).await?;
        self::month::count_month(self.store(), owner_id, first, tz).await
    }

    /// ## Summary
    /// Ordered occurrences on one local day in the owner's zone.
    ///
    /// ## Errors
    /// `InvalidInput` if the date does not exist, `NotFound` if the owner has
    /// no profile, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn day(
        &self,
        owner_id: OwnerId,
        year: i32,
        month: u32,
        day: u32,
    ) -> ServiceResult<Vec<Occurrence>> {
        let date = checked_date(year, month, day)?;
        let tz = self.zones.zone_for_owner(self.store(), owner_id).await?;
        self::day::list_day(self.store(), owner_id, date, tz).await
    }

    /// ## Summary
    /// The owner's next occurrences from `now` on, soonest first.
    ///
    /// ## Errors
    /// `NotFound` if the owner has no profile, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn upcoming(&self, owner_id: OwnerId, now: DateTime<Utc>) -> ServiceResult<Vec<Occurrence>> {
        let tz = self.zones.zone_for_owner(self.store(), owner_id).await?;
        upcoming::list_upcoming(self.store(), owner_id, now, tz, UPCOMING_DAYS, UPCOMING_LIMIT).await
    }

    /// ## Summary
    /// See [`due::list_due`].
    ///
    /// ## Errors
    /// See [`due::list_due`].
    #[tracing::instrument(skip(self))]
    pub async fn due_at(&self, at: DateTime<Utc>) -> ServiceResult<Vec<DueOccurrence>> {
        due::list_due(self.store(), &self.zones, at).await
    }

    /// ## Summary
    /// See [`event::create_event`].
    ///
    /// ## Errors
    /// See [`event::create_event`].
    #[tracing::instrument(skip(self, input))]
    pub async fn create_event(
        &self,
        owner_id: OwnerId,
        input: &CreateEventInput,
    ) -> ServiceResult<EventId> {
        event::create_event(self.store(), &self.zones, owner_id, input).await
    }

    /// ## Summary
    /// See [`event::delete_event`].
    ///
    /// ## Errors
    /// See [`event::delete_event`].
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(
        &self,
        owner_id: OwnerId,
        event_id: EventId,
        date: Option<&str>,
    ) -> ServiceResult<DeleteOutcome> {
        event::delete_event(self.store(), owner_id, event_id, date).await
    }
}
