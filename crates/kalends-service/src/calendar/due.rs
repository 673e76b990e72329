//! Occurrences due at one instant, across every owner.
//!
//! A reminder worker polls this once a minute. Each owner's definitions are
//! evaluated in that owner's zone, so the same stored instant can be due for
//! one participant and not for another whose local calendar skips it.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use kalends_core::model::{DueOccurrence, EventDefinition, EventId, OwnerId};

use super::cancellation::CancellationIndex;
use super::classify::classify;
use super::day::occurrence;
use super::month::unique;
use super::timezone::{ZoneResolver, local_to_utc, utc_to_local};
use crate::error::{ServiceError, ServiceResult};
use crate::store::EventStore;

/// ## Summary
/// Lists every occurrence starting within the minute that contains `at`,
/// ordered by owner.
///
/// Owners without a profile are evaluated in the default zone.
///
/// ## Errors
/// Propagates storage failures and conversion failures from
/// [`local_to_utc`].
#[tracing::instrument(skip(store, zones))]
pub async fn list_due(
    store: &dyn EventStore,
    zones: &ZoneResolver,
    at: DateTime<Utc>,
) -> ServiceResult<Vec<DueOccurrence>> {
    let from = at
        - TimeDelta::seconds(i64::from(at.second()))
        - TimeDelta::nanoseconds(i64::from(at.nanosecond()));
    let to = from + TimeDelta::minutes(1) - TimeDelta::milliseconds(1);

    let candidates = unique(store.due_candidates(from, to).await?);
    let ids: Vec<EventId> = candidates.iter().map(|def| def.id).collect();
    let cancellations = CancellationIndex::load(store, &ids).await?;

    let mut by_owner: BTreeMap<OwnerId, Vec<EventDefinition>> = BTreeMap::new();
    for def in candidates {
        by_owner.entry(def.owner_id).or_default().push(def);
    }

    let mut due = Vec::new();
    for (owner_id, definitions) in by_owner {
        let tz = match zones.zone_for_owner(store, owner_id).await {
            Ok(tz) => tz,
            Err(ServiceError::NotFound(_)) => {
                tracing::warn!(owner_id, "Owner has events but no profile, using default zone");
                zones.default_zone()
            }
            Err(e) => return Err(e),
        };
        let date = utc_to_local(tz, from).date();

        for def in &definitions {
            let local_start = utc_to_local(tz, def.start_at);
            let Some(label) = classify(def.recurrence, local_start.date(), date) else {
                continue;
            };
            if cancellations.is_cancelled(def.id, date) {
                continue;
            }
            let starts_at = local_to_utc(tz, date.and_time(local_start.time()))?;
            if (from..=to).contains(&starts_at) {
                due.push(DueOccurrence {
                    owner_id,
                    starts_at,
                    occurrence: occurrence(def, local_start, date, label, tz),
                });
            }
        }
    }

    tracing::debug!(due = due.len(), "Collected due occurrences");
    Ok(due)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono_tz::Europe;

    use kalends_core::model::{NewEventDefinition, RecurrenceKind};

    use super::*;
    use crate::store::MemoryEventStore;

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid instant")
    }

    async fn insert(
        store: &MemoryEventStore,
        owner_id: OwnerId,
        start_at: &str,
        recurrence: RecurrenceKind,
    ) -> EventId {
        store
            .insert_definition(&NewEventDefinition {
                id: uuid::Uuid::now_v7(),
                owner_id,
                description: format!("reminder for {owner_id}"),
                start_at: instant(start_at),
                stop_at: None,
                recurrence,
            })
            .await
            .expect("inserted")
    }

    #[test_log::test(tokio::test)]
    async fn test_due_collects_every_owner_in_the_minute() {
        let store = MemoryEventStore::new();
        store.put_profile(1, Some("Europe/Berlin"));
        store.put_profile(2, None);
        insert(&store, 1, "2026-06-01T12:00:00Z", RecurrenceKind::Daily).await;
        insert(&store, 2, "2026-06-10T12:00:00Z", RecurrenceKind::Never).await;
        insert(&store, 2, "2026-06-10T12:01:00Z", RecurrenceKind::Never).await;

        let zones = ZoneResolver::new(Europe::Moscow);
        let due = list_due(&store, &zones, instant("2026-06-10T12:00:42Z"))
            .await
            .expect("listed");

        let owners: Vec<OwnerId> = due.iter().map(|item| item.owner_id).collect();
        assert_eq!(owners, vec![1, 2]);
        assert!(due.iter().all(|item| item.starts_at == instant("2026-06-10T12:00:00Z")));
        assert_eq!(due[0].occurrence.start_hhmm(), "14:00");
        assert_eq!(due[1].occurrence.start_hhmm(), "15:00");
    }

    #[test_log::test(tokio::test)]
    async fn test_due_follows_local_wall_clock_across_dst() {
        let store = MemoryEventStore::new();
        store.put_profile(1, Some("Europe/Berlin"));
        // 09:00 in winter time
        let id = insert(&store, 1, "2026-03-01T08:00:00Z", RecurrenceKind::Daily).await;
        let zones = ZoneResolver::new(Europe::Moscow);

        // after the switch to summer time 09:00 is 07:00 UTC
        let summer = list_due(&store, &zones, instant("2026-04-01T07:00:00Z"))
            .await
            .expect("listed");
        assert_eq!(summer.len(), 1);
        assert!(
            list_due(&store, &zones, instant("2026-04-01T08:00:00Z"))
                .await
                .expect("listed")
                .is_empty()
        );

        store
            .insert_cancellation(id, NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date"))
            .await
            .expect("cancelled");
        assert!(
            list_due(&store, &zones, instant("2026-04-02T07:00:00Z"))
                .await
                .expect("listed")
                .is_empty()
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_owner_without_profile_uses_default_zone() {
        let store = MemoryEventStore::new();
        insert(&store, 9, "2026-06-01T09:00:00Z", RecurrenceKind::Daily).await;
        let zones = ZoneResolver::new(Europe::Moscow);

        let due = list_due(&store, &zones, instant("2026-06-05T09:00:00Z"))
            .await
            .expect("listed");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].occurrence.start_hhmm(), "12:00");
    }
}
