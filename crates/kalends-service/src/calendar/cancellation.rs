use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use kalends_core::model::{CancellationRecord, EventId};

use crate::error::ServiceResult;
use crate::store::EventStore;

/// Cancelled local dates per definition.
#[derive(Debug, Clone, Default)]
pub struct CancellationIndex {
    by_event: HashMap<EventId, HashSet<NaiveDate>>,
}

impl CancellationIndex {
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = CancellationRecord>) -> Self {
        let mut by_event: HashMap<EventId, HashSet<NaiveDate>> = HashMap::new();
        for record in records {
            by_event
                .entry(record.event_id)
                .or_default()
                .insert(record.cancel_date);
        }
        Self { by_event }
    }

    /// ## Summary
    /// Loads the cancellations of `event_ids` from the store.
    ///
    /// ## Errors
    /// Propagates storage failures.
    pub async fn load(store: &dyn EventStore, event_ids: &[EventId]) -> ServiceResult<Self> {
        if event_ids.is_empty() {
            return Ok(Self::default());
        }
        let records = store.find_cancellations(event_ids).await?;
        Ok(Self::from_records(records))
    }

    /// True if the occurrence of `event_id` on the local date `date` is
    /// cancelled. Only that exact date is affected.
    #[must_use]
    pub fn is_cancelled(&self, event_id: EventId, date: NaiveDate) -> bool {
        self.by_event
            .get(&event_id)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Suppression flag for each of `event_ids` on `date`.
    #[must_use]
    pub fn suppressed(&self, event_ids: &[EventId], date: NaiveDate) -> HashMap<EventId, bool> {
        event_ids
            .iter()
            .map(|&id| (id, self.is_cancelled(id, date)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_suppression_is_per_event_and_date() {
        let first = uuid::Uuid::now_v7();
        let second = uuid::Uuid::now_v7();
        let index = CancellationIndex::from_records([
            CancellationRecord {
                event_id: first,
                cancel_date: date(2026, 2, 28),
            },
            CancellationRecord {
                event_id: first,
                cancel_date: date(2026, 3, 31),
            },
        ]);

        assert!(index.is_cancelled(first, date(2026, 2, 28)));
        assert!(!index.is_cancelled(first, date(2026, 3, 28)));
        assert!(!index.is_cancelled(second, date(2026, 2, 28)));

        let flags = index.suppressed(&[first, second], date(2026, 3, 31));
        assert_eq!(flags.get(&first), Some(&true));
        assert_eq!(flags.get(&second), Some(&false));
    }

    #[test_log::test(tokio::test)]
    async fn test_load_skips_store_for_empty_batch() {
        let store = crate::store::MemoryEventStore::new();
        let index = CancellationIndex::load(&store, &[]).await.expect("loaded");
        assert!(!index.is_cancelled(uuid::Uuid::nil(), date(2026, 1, 1)));
    }
}
