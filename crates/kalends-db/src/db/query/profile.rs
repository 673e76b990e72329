//! Query composition for `owner_profile`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use kalends_core::model::{OwnerId, OwnerProfile};

use crate::db::connection::DbConnection;
use crate::db::schema::owner_profile;
use crate::error::DbResult;
use crate::model::profile::OwnerProfileRow;

/// ## Summary
/// Finds the profile of an owner.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find(conn: &mut DbConnection<'_>, owner_id: OwnerId) -> DbResult<Option<OwnerProfile>> {
    let row = owner_profile::table
        .filter(owner_profile::owner_id.eq(owner_id))
        .select(OwnerProfileRow::as_select())
        .first::<OwnerProfileRow>(conn)
        .await
        .optional()?;

    Ok(row.map(OwnerProfile::from))
}
