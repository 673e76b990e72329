//! Database enum types with Diesel serialization.
//!
//! Each enum mirrors a CHECK constraint and implements `ToSql` and `FromSql`
//! for conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::io::Write;

use kalends_core::model::RecurrenceLabel;

/// Recurrence pattern name.
///
/// Maps to `event_definition.recurrence` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum RecurrenceToken {
    Never,
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl ToSql<Text, Pg> for RecurrenceToken {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(RecurrenceLabel::from(*self).as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for RecurrenceToken {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"never" => Ok(Self::Never),
            b"daily" => Ok(Self::Daily),
            b"weekly" => Ok(Self::Weekly),
            b"monthly" => Ok(Self::Monthly),
            b"annual" => Ok(Self::Annual),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl From<RecurrenceLabel> for RecurrenceToken {
    fn from(label: RecurrenceLabel) -> Self {
        match label {
            RecurrenceLabel::Never => Self::Never,
            RecurrenceLabel::Daily => Self::Daily,
            RecurrenceLabel::Weekly => Self::Weekly,
            RecurrenceLabel::Monthly => Self::Monthly,
            RecurrenceLabel::Annual => Self::Annual,
        }
    }
}

impl From<RecurrenceToken> for RecurrenceLabel {
    fn from(token: RecurrenceToken) -> Self {
        match token {
            RecurrenceToken::Never => Self::Never,
            RecurrenceToken::Daily => Self::Daily,
            RecurrenceToken::Weekly => Self::Weekly,
            RecurrenceToken::Monthly => Self::Monthly,
            RecurrenceToken::Annual => Self::Annual,
        }
    }
}
