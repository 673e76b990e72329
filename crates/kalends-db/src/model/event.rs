//! Models for the event definition table.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use kalends_core::model::{
    DayOfMonth, EventDefinition, MonthOfYear, NewEventDefinition, RecurrenceKind, WeekdayIndex,
};

use crate::db::enums::RecurrenceToken;
use crate::db::schema::event_definition;
use crate::error::{DbError, DbResult};

/// Event definition row.
///
/// The recurrence is spread over a token and four nullable parameter
/// columns; [`EventDefinition`] folds them back into one tagged value.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = event_definition)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventRow {
    pub id: Uuid,
    pub owner_id: i64,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub stop_at: Option<DateTime<Utc>>,
    pub recurrence: RecurrenceToken,
    pub weekly_day: Option<i16>,
    pub monthly_day: Option<i16>,
    pub annual_day: Option<i16>,
    pub annual_month: Option<i16>,
    pub created_at: DateTime<Utc>,
}

/// New event definition row for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_definition)]
pub struct NewEventRow<'a> {
    pub id: Uuid,
    pub owner_id: i64,
    pub description: &'a str,
    pub start_at: DateTime<Utc>,
    pub stop_at: Option<DateTime<Utc>>,
    pub recurrence: RecurrenceToken,
    pub weekly_day: Option<i16>,
    pub monthly_day: Option<i16>,
    pub annual_day: Option<i16>,
    pub annual_month: Option<i16>,
}

impl<'a> From<&'a NewEventDefinition> for NewEventRow<'a> {
    fn from(def: &'a NewEventDefinition) -> Self {
        let mut row = Self {
            id: def.id,
            owner_id: def.owner_id,
            description: &def.description,
            start_at: def.start_at,
            stop_at: def.stop_at,
            recurrence: def.recurrence.label().into(),
            weekly_day: None,
            monthly_day: None,
            annual_day: None,
            annual_month: None,
        };
        match def.recurrence {
            RecurrenceKind::Never | RecurrenceKind::Daily => {}
            RecurrenceKind::Weekly { weekday } => row.weekly_day = Some(weekday.get().into()),
            RecurrenceKind::Monthly { day } => row.monthly_day = Some(day.get().into()),
            RecurrenceKind::Annual { day, month } => {
                row.annual_day = Some(day.get().into());
                row.annual_month = Some(month.get().into());
            }
        }
        row
    }
}

impl EventRow {
    fn corrupt(&self, reason: impl Into<String>) -> DbError {
        DbError::CorruptRow {
            table: "event_definition",
            id: self.id.to_string(),
            reason: reason.into(),
        }
    }

    fn param(&self, name: &str, value: Option<i16>) -> DbResult<u8> {
        let value = value.ok_or_else(|| self.corrupt(format!("{name} is missing")))?;
        u8::try_from(value).map_err(|_overflow| self.corrupt(format!("{name} out of range: {value}")))
    }

    fn recurrence_kind(&self) -> DbResult<RecurrenceKind> {
        let kind = match self.recurrence {
            RecurrenceToken::Never => RecurrenceKind::Never,
            RecurrenceToken::Daily => RecurrenceKind::Daily,
            RecurrenceToken::Weekly => RecurrenceKind::Weekly {
                weekday: WeekdayIndex::new(self.param("weekly_day", self.weekly_day)?)?,
            },
            RecurrenceToken::Monthly => RecurrenceKind::Monthly {
                day: DayOfMonth::new(self.param("monthly_day", self.monthly_day)?)?,
            },
            RecurrenceToken::Annual => RecurrenceKind::Annual {
                day: DayOfMonth::new(self.param("annual_day", self.annual_day)?)?,
                month: MonthOfYear::new(self.param("annual_month", self.annual_month)?)?,
            },
        };
        Ok(kind)
    }
}

impl TryFrom<EventRow> for EventDefinition {
    type Error = DbError;

    fn try_from(row: EventRow) -> DbResult<Self> {
        let recurrence = row.recurrence_kind()?;
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            description: row.description,
            start_at: row.start_at,
            stop_at: row.stop_at,
            recurrence,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(recurrence: RecurrenceToken) -> EventRow {
        EventRow {
            id: Uuid::nil(),
            owner_id: 7,
            description: "standup".to_string(),
            start_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            stop_at: None,
            recurrence,
            weekly_day: None,
            monthly_day: None,
            annual_day: None,
            annual_month: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_row_folds_into_weekly_kind() {
        let mut weekly = row(RecurrenceToken::Weekly);
        weekly.weekly_day = Some(2);

        let def = EventDefinition::try_from(weekly).expect("valid row");
        assert_eq!(
            def.recurrence,
            RecurrenceKind::Weekly {
                weekday: WeekdayIndex::new(2).unwrap()
            }
        );
    }

    #[test]
    fn test_row_missing_parameter_is_corrupt() {
        let monthly = row(RecurrenceToken::Monthly);
        let err = EventDefinition::try_from(monthly).expect_err("missing monthly_day");
        assert!(matches!(err, DbError::CorruptRow { .. }));
    }

    #[test]
    fn test_row_out_of_range_parameter_is_rejected() {
        let mut annual = row(RecurrenceToken::Annual);
        annual.annual_day = Some(12);
        annual.annual_month = Some(13);
        assert!(EventDefinition::try_from(annual).is_err());

        let mut weekly = row(RecurrenceToken::Weekly);
        weekly.weekly_day = Some(-1);
        assert!(matches!(
            EventDefinition::try_from(weekly),
            Err(DbError::CorruptRow { .. })
        ));
    }

    #[test]
    fn test_new_row_spreads_annual_parameters() {
        let def = NewEventDefinition {
            id: Uuid::nil(),
            owner_id: 7,
            description: "birthday".to_string(),
            start_at: Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
            stop_at: None,
            recurrence: RecurrenceKind::Annual {
                day: DayOfMonth::new(14).unwrap(),
                month: MonthOfYear::new(3).unwrap(),
            },
        };

        let new_row = NewEventRow::from(&def);
        assert_eq!(new_row.recurrence, RecurrenceToken::Annual);
        assert_eq!(new_row.annual_day, Some(14));
        assert_eq!(new_row.annual_month, Some(3));
        assert_eq!(new_row.weekly_day, None);
        assert_eq!(new_row.monthly_day, None);
    }
}
