use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use kalends_core::model::{EventDefinition, EventId, OwnerId};

use super::cancellation::CancellationIndex;
use super::candidate::range_candidates;
use super::classify::classify;
use super::timezone::utc_to_local;
use super::window::LocalWindow;
use crate::error::ServiceResult;
use crate::store::EventStore;

/// Occurrence count for every day of one month, keyed 1..=days in month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCounts {
    days: BTreeMap<u32, u32>,
}

impl MonthCounts {
    fn zeroed(window: &LocalWindow) -> Self {
        Self {
            days: window.days().map(|day| (day.day(), 0)).collect(),
        }
    }

    fn bump(&mut self, date: NaiveDate) {
        *self.days.entry(date.day()).or_default() += 1;
    }

    /// Count on day-of-month `day`, `None` if the month has no such day.
    #[must_use]
    pub fn get(&self, day: u32) -> Option<u32> {
        self.days.get(&day).copied()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.days.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.days.iter().map(|(&day, &count)| (day, count))
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<u32, u32> {
        self.days
    }
}

/// ## Summary
/// Counts occurrences per local day of the month starting on
/// `first_of_month`, as seen in `tz`.
///
/// Every day of the month is present in the result, zero included.
///
/// ## Errors
/// Propagates storage failures; no partial counts are returned.
#[tracing::instrument(skip(store, tz), fields(tz = %tz))]
pub async fn count_month(
    store: &dyn EventStore,
    owner_id: OwnerId,
    first_of_month: NaiveDate,
    tz: Tz,
) -> ServiceResult<MonthCounts> {
    let window = LocalWindow::month(first_of_month, tz)?;
    let candidates = unique(store.query_candidates(&range_candidates(owner_id, &window)).await?);
    let ids: Vec<EventId> = candidates.iter().map(|def| def.id).collect();
    let cancellations = CancellationIndex::load(store, &ids).await?;

    let mut counts = MonthCounts::zeroed(&window);
    for def in &candidates {
        let local_start = utc_to_local(tz, def.start_at).date();
        for day in window.days() {
            if classify(def.recurrence, local_start, day).is_some()
                && !cancellations.is_cancelled(def.id, day)
            {
                counts.bump(day);
            }
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        occurrences = counts.total(),
        "Counted month"
    );
    Ok(counts)
}

/// Drops repeated ids, keeping the first copy.
pub(super) fn unique(definitions: Vec<EventDefinition>) -> Vec<EventDefinition> {
    let mut seen = HashSet::new();
    definitions
        .into_iter()
        .filter(|def| seen.insert(def.id))
        .collect()
}
