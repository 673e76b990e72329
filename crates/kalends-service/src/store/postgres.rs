//! `EventStore` backed by PostgreSQL through the `kalends-db` queries.

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;
use tracing::Instrument;

use kalends_core::model::{
    CancellationRecord, CandidateQuery, EventDefinition, EventId, NewEventDefinition, OwnerId,
    OwnerProfile,
};
use kalends_db::db::connection::{DbPool, checkout};
use kalends_db::db::query;

use super::EventStore;
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct PgEventStore {
    pool: DbPool,
}

impl PgEventStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl EventStore for PgEventStore {
    fn fetch_profile(&self, owner_id: OwnerId) -> BoxFuture<'_, ServiceResult<Option<OwnerProfile>>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::profile::find(&mut conn, owner_id).await?)
        }
        .instrument(tracing::debug_span!("fetch_profile", owner_id)))
    }

    fn query_candidates<'a>(
        &'a self,
        filter: &'a CandidateQuery,
    ) -> BoxFuture<'a, ServiceResult<Vec<EventDefinition>>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::event::load_candidates(&mut conn, filter).await?)
        }
        .instrument(tracing::debug_span!("query_candidates", owner_id = filter.owner_id)))
    }

    fn due_candidates(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, ServiceResult<Vec<EventDefinition>>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::event::load_due(&mut conn, from, to).await?)
        }
        .instrument(tracing::debug_span!("due_candidates", %from, %to)))
    }

    fn find_cancellations<'a>(
        &'a self,
        event_ids: &'a [EventId],
    ) -> BoxFuture<'a, ServiceResult<Vec<CancellationRecord>>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::cancellation::load_for_events(&mut conn, event_ids).await?)
        }
        .instrument(tracing::debug_span!("find_cancellations", event_count = event_ids.len())))
    }

    fn find_definition(
        &self,
        owner_id: OwnerId,
        event_id: EventId,
    ) -> BoxFuture<'_, ServiceResult<Option<EventDefinition>>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::event::find_for_owner(&mut conn, owner_id, event_id).await?)
        }
        .instrument(tracing::debug_span!("find_definition", owner_id, event_id = %event_id)))
    }

    fn insert_definition<'a>(
        &'a self,
        definition: &'a NewEventDefinition,
    ) -> BoxFuture<'a, ServiceResult<EventId>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::event::insert(&mut conn, definition).await?)
        }
        .instrument(tracing::debug_span!("insert_definition", owner_id = definition.owner_id)))
    }

    fn insert_cancellation(
        &self,
        event_id: EventId,
        cancel_date: NaiveDate,
    ) -> BoxFuture<'_, ServiceResult<()>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            Ok(query::cancellation::insert(&mut conn, event_id, cancel_date).await?)
        }
        .instrument(tracing::debug_span!("insert_cancellation", event_id = %event_id, %cancel_date)))
    }

    fn delete_definition(&self, event_id: EventId) -> BoxFuture<'_, ServiceResult<()>> {
        Box::pin(async move {
            let mut conn = checkout(&self.pool).await?;
            let deleted = query::event::delete_by_id(&mut conn, event_id).await?;
            tracing::debug!(deleted, "Deleted event definition");
            Ok(())
        }
        .instrument(tracing::debug_span!("delete_definition", event_id = %event_id)))
    }
}
