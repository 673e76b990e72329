//! Storage port consumed by the calendar engine.
//!
//! The engine never talks to a database directly. It hands value-typed
//! windows and ids to an [`EventStore`] and gets immutable records back.

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;

use kalends_core::model::{
    CancellationRecord, CandidateQuery, EventDefinition, EventId, NewEventDefinition, OwnerId,
    OwnerProfile,
};

use crate::error::ServiceResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

pub trait EventStore: Send + Sync {
    /// Profile of the owner, or `None` if the identity service has no record.
    fn fetch_profile(&self, owner_id: OwnerId) -> BoxFuture<'_, ServiceResult<Option<OwnerProfile>>>;

    /// Every definition that may produce an occurrence inside the query window.
    fn query_candidates<'a>(
        &'a self,
        query: &'a CandidateQuery,
    ) -> BoxFuture<'a, ServiceResult<Vec<EventDefinition>>>;

    /// Every definition, whoever owns it, that may start inside `[from, to]`.
    fn due_candidates(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, ServiceResult<Vec<EventDefinition>>>;

    fn find_cancellations<'a>(
        &'a self,
        event_ids: &'a [EventId],
    ) -> BoxFuture<'a, ServiceResult<Vec<CancellationRecord>>>;

    /// The definition with `event_id`, only if it belongs to `owner_id`.
    fn find_definition(
        &self,
        owner_id: OwnerId,
        event_id: EventId,
    ) -> BoxFuture<'_, ServiceResult<Option<EventDefinition>>>;

    fn insert_definition<'a>(
        &'a self,
        definition: &'a NewEventDefinition,
    ) -> BoxFuture<'a, ServiceResult<EventId>>;

    fn insert_cancellation(
        &self,
        event_id: EventId,
        cancel_date: NaiveDate,
    ) -> BoxFuture<'_, ServiceResult<()>>;

    /// Removes the definition together with its cancellations.
    fn delete_definition(&self, event_id: EventId) -> BoxFuture<'_, ServiceResult<()>>;
}
