//! Timezone resolution and local/UTC conversion.
//!
//! Every place that turns a wall-clock time into an instant goes through
//! [`local_to_utc`], which applies one fixed policy at DST transitions:
//!
//! - ambiguous wall time (clocks fall back): the earlier instant wins.
//! - nonexistent wall time (clocks spring forward): the wall time is read
//!   with the offset in force just before the gap, so the instant lands
//!   after the gap.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

use kalends_core::error::CoreError;
use kalends_core::model::OwnerId;

use crate::error::{ServiceError, ServiceResult};
use crate::store::EventStore;

/// Upper bound on how far back a gap search looks for the pre-gap offset.
const GAP_SEARCH_LIMIT: TimeDelta = TimeDelta::days(2);
const GAP_SEARCH_STEP: TimeDelta = TimeDelta::minutes(15);

/// Maps owners to zones, falling back to a process-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneResolver {
    default: Tz,
}

impl ZoneResolver {
    #[must_use]
    pub const fn new(default: Tz) -> Self {
        Self { default }
    }

    /// ## Summary
    /// Builds a resolver from the configured default zone name.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if the name is not a known zone.
    pub fn from_name(default: &str) -> ServiceResult<Self> {
        Self::resolve(default).map(Self::new).ok_or_else(|| {
            ServiceError::CoreError(CoreError::InvalidConfiguration(format!(
                "unknown default timezone: {default}"
            )))
        })
    }

    #[must_use]
    pub const fn default_zone(&self) -> Tz {
        self.default
    }

    /// ## Summary
    /// Parses a zone identifier after normalizing vendor prefixes, aliases
    /// and Windows zone names.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Tz> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        Tz::from_str(&normalize_zone_name(trimmed)).ok()
    }

    /// ## Summary
    /// Returns the zone of `owner_id`, or the default if the profile names
    /// none.
    ///
    /// A profile naming an unknown zone is logged and treated as naming none.
    ///
    /// ## Errors
    /// Returns `NotFound` if the owner has no profile, or a storage error.
    pub async fn zone_for_owner(
        &self,
        store: &dyn EventStore,
        owner_id: OwnerId,
    ) -> ServiceResult<Tz> {
        let profile = store
            .fetch_profile(owner_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("owner {owner_id} has no profile")))?;

        let Some(name) = profile.time_zone.as_deref() else {
            return Ok(self.default);
        };

        if let Some(tz) = Self::resolve(name) {
            Ok(tz)
        } else {
            tracing::warn!(
                owner_id,
                time_zone = name,
                default = %self.default,
                "Unknown profile timezone, using default"
            );
            Ok(self.default)
        }
    }
}

/// Normalizes zone identifiers to canonical IANA names using ICU.
fn normalize_zone_name(name: &str) -> String {
    let stripped = name
        .strip_prefix("/mozilla.org/")
        .or_else(|| name.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(name);

    let iana = IanaParserExtended::new();

    if let Some(zone) = WindowsParser::new().parse(stripped, None)
        && let Some(entry) = iana.iter().find(|entry| entry.time_zone == zone)
    {
        return entry.canonical.to_string();
    }

    let parsed = iana.parse(stripped);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        stripped.to_string()
    } else {
        parsed.canonical.to_string()
    }
}

/// ## Summary
/// Converts a wall-clock time in `tz` to an instant.
///
/// ## Errors
/// Returns `InvariantViolation` if no offset can be found for a nonexistent
/// wall time, which would mean a gap longer than two days.
pub fn local_to_utc(tz: Tz, local: NaiveDateTime) -> ServiceResult<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, later) => {
            Ok(earlier.min(later).with_timezone(&Utc))
        }
        LocalResult::None => {
            let offset = offset_before_gap(tz, local).ok_or(ServiceError::CoreError(
                CoreError::InvariantViolation("no offset found before timezone gap"),
            ))?;
            Ok((local - TimeDelta::seconds(i64::from(offset))).and_utc())
        }
    }
}

/// Seconds east of UTC in force shortly before the gap containing `local`.
fn offset_before_gap(tz: Tz, local: NaiveDateTime) -> Option<i32> {
    let mut cursor = local;
    let mut searched = TimeDelta::zero();
    while searched < GAP_SEARCH_LIMIT {
        cursor = cursor.checked_sub_signed(GAP_SEARCH_STEP)?;
        searched += GAP_SEARCH_STEP;
        if let Some(before) = tz.from_local_datetime(&cursor).earliest() {
            return Some(before.offset().fix().local_minus_utc());
        }
    }
    None
}

/// Wall-clock time of `instant` in `tz`.
#[must_use]
pub fn utc_to_local(tz: Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono_tz::{America, Asia, Europe};

    use super::*;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid wall time")
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        wall(y, m, d, h, min).and_utc()
    }

    #[test]
    fn test_plain_conversion_round_trips() {
        let local = wall(2026, 1, 14, 9, 30);
        let instant = local_to_utc(Europe::Moscow, local).expect("convertible");
        assert_eq!(instant, utc(2026, 1, 14, 6, 30));
        assert_eq!(utc_to_local(Europe::Moscow, instant), local);
    }

    #[test]
    fn test_new_york_fall_back_takes_earlier_instant() {
        // 01:30 happens twice on 2026-11-01: EDT (-4) first, then EST (-5)
        let instant = local_to_utc(America::New_York, wall(2026, 11, 1, 1, 30)).expect("convertible");
        assert_eq!(instant, utc(2026, 11, 1, 5, 30));
    }

    #[test]
    fn test_new_york_spring_forward_uses_pre_gap_offset() {
        // 02:30 does not exist on 2026-03-08; read with EST (-5) it is 07:30Z
        let instant = local_to_utc(America::New_York, wall(2026, 3, 8, 2, 30)).expect("convertible");
        assert_eq!(instant, utc(2026, 3, 8, 7, 30));
        assert_eq!(
            utc_to_local(America::New_York, instant),
            wall(2026, 3, 8, 3, 30)
        );
    }

    #[test]
    fn test_berlin_transitions() {
        let gap = local_to_utc(Europe::Berlin, wall(2026, 3, 29, 2, 30)).expect("convertible");
        assert_eq!(gap, utc(2026, 3, 29, 1, 30));
        assert_eq!(utc_to_local(Europe::Berlin, gap), wall(2026, 3, 29, 3, 30));

        let fold = local_to_utc(Europe::Berlin, wall(2026, 10, 25, 2, 30)).expect("convertible");
        assert_eq!(fold, utc(2026, 10, 25, 0, 30));
    }

    #[test]
    fn test_midnight_gap_resolves_to_first_local_hour() {
        // Beirut skips 00:00..01:00 on the last Sunday of March
        let midnight = local_to_utc(Asia::Beirut, wall(2026, 3, 29, 0, 0)).expect("convertible");
        assert_eq!(midnight, utc(2026, 3, 28, 22, 0));
        assert_eq!(
            utc_to_local(Asia::Beirut, midnight),
            wall(2026, 3, 29, 1, 0)
        );
    }

    #[test]
    fn test_resolve_normalizes_names() {
        assert_eq!(ZoneResolver::resolve("Europe/Berlin"), Some(Europe::Berlin));
        assert_eq!(
            ZoneResolver::resolve("/mozilla.org/Europe/Berlin"),
            Some(Europe::Berlin)
        );
        assert_eq!(
            ZoneResolver::resolve("Eastern Standard Time"),
            Some(America::New_York)
        );
        assert_eq!(ZoneResolver::resolve("Mars/Olympus_Mons"), None);
        assert_eq!(ZoneResolver::resolve("  "), None);
    }

    #[test]
    fn test_from_name_rejects_unknown_default() {
        assert!(ZoneResolver::from_name("Europe/Moscow").is_ok());
        assert!(matches!(
            ZoneResolver::from_name("Nowhere/Town"),
            Err(ServiceError::CoreError(CoreError::InvalidConfiguration(_)))
        ));
    }

    #[test_log::test(tokio::test)]
    async fn test_zone_for_owner_falls_back_and_rejects_missing_profile() {
        let store = crate::store::MemoryEventStore::new();
        store.put_profile(1, Some("Asia/Tokyo"));
        store.put_profile(2, None);
        store.put_profile(3, Some("Not/AZone"));

        let zones = ZoneResolver::new(Europe::Moscow);
        assert_eq!(
            zones.zone_for_owner(&store, 1).await.expect("profile"),
            Asia::Tokyo
        );
        assert_eq!(
            zones.zone_for_owner(&store, 2).await.expect("profile"),
            Europe::Moscow
        );
        assert_eq!(
            zones.zone_for_owner(&store, 3).await.expect("profile"),
            Europe::Moscow
        );
        assert!(matches!(
            zones.zone_for_owner(&store, 4).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
