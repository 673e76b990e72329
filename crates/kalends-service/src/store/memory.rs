//! In-process `EventStore`.
//!
//! Keeps everything in a mutex-guarded map and evaluates candidate queries
//! with [`CandidateQuery::matches`]. Used by tests and for running the server
//! without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, ready};

use kalends_core::model::{
    CancellationRecord, CandidateQuery, EventDefinition, EventId, NewEventDefinition, OwnerId,
    OwnerProfile,
};

use super::EventStore;
use crate::error::ServiceResult;

#[derive(Debug, Default)]
struct MemoryState {
    profiles: HashMap<OwnerId, OwnerProfile>,
    events: BTreeMap<EventId, EventDefinition>,
    cancellations: BTreeSet<(EventId, NaiveDate)>,
}

#[derive(Debug, Default)]
pub struct MemoryEventStore {
    state: Mutex<MemoryState>,
}

impl MemoryEventStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state and recovers from poisoning.
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.state.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// ## Summary
    /// Creates or replaces the profile of `owner_id`.
    pub fn put_profile(&self, owner_id: OwnerId, time_zone: Option<&str>) {
        self.lock().profiles.insert(
            owner_id,
            OwnerProfile {
                owner_id,
                time_zone: time_zone.map(str::to_string),
            },
        );
    }

    /// Number of stored definitions across all owners.
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.lock().events.len()
    }

    /// All definitions owned by `owner_id`, in id order.
    #[must_use]
    pub fn definitions_of(&self, owner_id: OwnerId) -> Vec<EventDefinition> {
        self.lock()
            .events
            .values()
            .filter(|def| def.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

impl EventStore for MemoryEventStore {
    fn fetch_profile(&self, owner_id: OwnerId) -> BoxFuture<'_, ServiceResult<Option<OwnerProfile>>> {
        let profile = self.lock().profiles.get(&owner_id).cloned();
        ready(Ok(profile)).boxed()
    }

    fn query_candidates<'a>(
        &'a self,
        query: &'a CandidateQuery,
    ) -> BoxFuture<'a, ServiceResult<Vec<EventDefinition>>> {
        let candidates = self
            .lock()
            .events
            .values()
            .filter(|def| query.matches(def))
            .cloned()
            .collect();
        ready(Ok(candidates)).boxed()
    }

    fn due_candidates(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, ServiceResult<Vec<EventDefinition>>> {
        let candidates = self
            .lock()
            .events
            .values()
            .filter(|def| def.start_at <= to && (def.recurrence.is_recurring() || def.start_at >= from))
            .cloned()
            .collect();
        ready(Ok(candidates)).boxed()
    }

    fn find_cancellations<'a>(
        &'a self,
        event_ids: &'a [EventId],
    ) -> BoxFuture<'a, ServiceResult<Vec<CancellationRecord>>> {
        let records = self
            .lock()
            .cancellations
            .iter()
            .filter(|(event_id, _)| event_ids.contains(event_id))
            .map(|&(event_id, cancel_date)| CancellationRecord {
                event_id,
                cancel_date,
            })
            .collect();
        ready(Ok(records)).boxed()
    }

    fn find_definition(
        &self,
        owner_id: OwnerId,
        event_id: EventId,
    ) -> BoxFuture<'_, ServiceResult<Option<EventDefinition>>> {
        let definition = self
            .lock()
            .events
            .get(&event_id)
            .filter(|def| def.owner_id == owner_id)
            .cloned();
        ready(Ok(definition)).boxed()
    }

    fn insert_definition<'a>(
        &'a self,
        definition: &'a NewEventDefinition,
    ) -> BoxFuture<'a, ServiceResult<EventId>> {
        let stored = EventDefinition {
            id: definition.id,
            owner_id: definition.owner_id,
            description: definition.description.clone(),
            start_at: definition.start_at,
            stop_at: definition.stop_at,
            recurrence: definition.recurrence,
            created_at: Utc::now(),
        };
        self.lock().events.insert(stored.id, stored);
        ready(Ok(definition.id)).boxed()
    }

    fn insert_cancellation(
        &self,
        event_id: EventId,
        cancel_date: NaiveDate,
    ) -> BoxFuture<'_, ServiceResult<()>> {
        self.lock().cancellations.insert((event_id, cancel_date));
        ready(Ok(())).boxed()
    }

    fn delete_definition(&self, event_id: EventId) -> BoxFuture<'_, ServiceResult<()>> {
        let mut state = self.lock();
        state.events.remove(&event_id);
        state.cancellations.retain(|(id, _)| *id != event_id);
        drop(state);
        ready(Ok(())).boxed()
    }
}
