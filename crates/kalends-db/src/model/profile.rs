use chrono::{DateTime, Utc};
use diesel::prelude::*;

use kalends_core::model::OwnerProfile;

use crate::db::schema::owner_profile;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = owner_profile)]
#[diesel(primary_key(owner_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OwnerProfileRow {
    pub owner_id: i64,
    pub time_zone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OwnerProfileRow> for OwnerProfile {
    fn from(row: OwnerProfileRow) -> Self {
        Self {
            owner_id: row.owner_id,
            time_zone: row.time_zone,
        }
    }
}
