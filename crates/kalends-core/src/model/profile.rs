use serde::{Deserialize, Serialize};

/// Identity of the calendar owner, issued by the external identity service.
pub type OwnerId = i64;

/// The slice of an owner's profile the calendar engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub owner_id: OwnerId,
    /// IANA zone name, if the owner has chosen one.
    pub time_zone: Option<String>,
}
