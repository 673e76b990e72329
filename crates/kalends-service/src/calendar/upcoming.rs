use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use kalends_core::model::{EventId, Occurrence, OwnerId};

use super::cancellation::CancellationIndex;
use super::candidate::range_candidates;
use super::classify::classify;
use super::day::occurrence;
use super::month::unique;
use super::timezone::{local_to_utc, utc_to_local};
use super::window::LocalWindow;
use crate::error::ServiceResult;
use crate::store::EventStore;

/// ## Summary
/// Lists the next occurrences starting at or after `now`, soonest first.
///
/// The search covers `days` local days in `tz`, today included, and stops
/// at `limit` occurrences.
///
/// ## Errors
/// Propagates storage failures and conversion failures from
/// [`local_to_utc`].
#[tracing::instrument(skip(store, tz), fields(tz = %tz))]
pub async fn list_upcoming(
    store: &dyn EventStore,
    owner_id: OwnerId,
    now: DateTime<Utc>,
    tz: Tz,
    days: u32,
    limit: usize,
) -> ServiceResult<Vec<Occurrence>> {
    let today = utc_to_local(tz, now).date();
    let window = LocalWindow::spanning(
        today,
        today + TimeDelta::days(i64::from(days.saturating_sub(1))),
        tz,
    )?;
    let candidates = unique(store.query_candidates(&range_candidates(owner_id, &window)).await?);
    let ids: Vec<EventId> = candidates.iter().map(|def| def.id).collect();
    let cancellations = CancellationIndex::load(store, &ids).await?;

    let mut upcoming: Vec<(DateTime<Utc>, Occurrence)> = Vec::new();
    for def in &candidates {
        let local_start = utc_to_local(tz, def.start_at);
        for day in window.days() {
            let Some(label) = classify(def.recurrence, local_start.date(), day) else {
                continue;
            };
            if cancellations.is_cancelled(def.id, day) {
                continue;
            }
            let starts_at = local_to_utc(tz, day.and_time(local_start.time()))?;
            if starts_at >= now {
                upcoming.push((starts_at, occurrence(def, local_start, day, label, tz)));
            }
        }
    }

    upcoming.sort_by_key(|(starts_at, _)| *starts_at);
    upcoming.truncate(limit);
    tracing::debug!(
        candidates = candidates.len(),
        upcoming = upcoming.len(),
        "Listed upcoming occurrences"
    );
    Ok(upcoming.into_iter().map(|(_, occurrence)| occurrence).collect())
}
