//! Ownership guard shared by every application operation.
//!
//! A record is only visible to the account that registered it. Callers that
//! fail the check are told the record does not exist.

use crate::entity::oauth2_application;

/// Identity of the account performing a request, as resolved by the
/// authentication layer in front of this service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub owner_id: String,
}

impl Caller {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

/// Exact-ownership policy: no delegation, sharing or admin override.
pub fn authorize(caller: &Caller, record: &oauth2_application::Model) -> bool {
    record.owner_id == caller.owner_id
}

/// Filters a looked-up record down to what the caller may see.
pub fn visible_to(
    caller: &Caller,
    record: Option<oauth2_application::Model>,
) -> Option<oauth2_application::Model> {
    let record = record?;
    if authorize(caller, &record) {
        Some(record)
    } else {
        tracing::warn!(
            application_id = record.id,
            caller = %caller.owner_id,
            "Ownership check failed, reporting application as not found"
        );
        None
    }
}
