use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use kalends_core::model::{EventDefinition, EventId, Occurrence, OwnerId, RecurrenceLabel};

use super::cancellation::CancellationIndex;
use super::candidate::day_candidates;
use super::classify::classify;
use super::month::unique;
use super::timezone::utc_to_local;
use super::window::LocalWindow;
use crate::error::ServiceResult;
use crate::store::EventStore;

/// ## Summary
/// Lists the occurrences on the local date `date` in `tz`, ordered by local
/// start time to the minute. Occurrences starting in the same minute keep
/// the order the store returned them in.
///
/// ## Errors
/// Propagates storage failures.
#[tracing::instrument(skip(store, tz), fields(tz = %tz))]
pub async fn list_day(
    store: &dyn EventStore,
    owner_id: OwnerId,
    date: NaiveDate,
    tz: Tz,
) -> ServiceResult<Vec<Occurrence>> {
    let window = LocalWindow::day(date, tz)?;
    let candidates = unique(store.query_candidates(&day_candidates(owner_id, &window)).await?);
    let ids: Vec<EventId> = candidates.iter().map(|def| def.id).collect();
    let cancellations = CancellationIndex::load(store, &ids).await?;
    let suppressed = cancellations.suppressed(&ids, date);

    let mut occurrences: Vec<Occurrence> = candidates
        .into_iter()
        .filter(|def| !suppressed.get(&def.id).copied().unwrap_or(false))
        .filter_map(|def| {
            let local_start = utc_to_local(tz, def.start_at);
            let label = classify(def.recurrence, local_start.date(), date)?;
            Some(occurrence(&def, local_start, date, label, tz))
        })
        .collect();

    occurrences.sort_by_key(Occurrence::sort_key);
    tracing::debug!(occurrences = occurrences.len(), "Listed day");
    Ok(occurrences)
}

/// The occurrence of `def` on `date`, keeping the wall-clock start of
/// `local_start`.
pub(super) fn occurrence(
    def: &EventDefinition,
    local_start: NaiveDateTime,
    date: NaiveDate,
    label: RecurrenceLabel,
    tz: Tz,
) -> Occurrence {
    Occurrence {
        event_id: def.id,
        description: def.description.clone(),
        local_date: date,
        local_start_time: local_start.time(),
        local_stop_time: def.stop_at.map(|stop| utc_to_local(tz, stop).time()),
        recurrence: label,
        is_single: def.is_single(),
    }
}
