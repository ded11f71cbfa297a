// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tripdesk_domain::TripState;

use crate::error::PersistenceError;

/// A persisted audit log entry, as read back from the database.
///
/// This is the stored form of a `tripdesk_audit::AuditEntry` plus the
/// identifiers and timestamp the database assigned. The actor kind is
/// recorded inside `metadata` (the `actor` key); `changed_by_id` carries
/// the staff identifier and is `NULL` for client and sweep actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripAuditRecord {
    /// Row identifier, strictly increasing per trip timeline.
    pub id: i64,
    /// The trip this entry belongs to.
    pub scheduled_trip_id: i64,
    /// The state before the change. `None` only for the creation entry.
    pub previous_state: Option<TripState>,
    /// The state after the change.
    pub new_state: TripState,
    /// The acting staff member, when one drove the change.
    pub changed_by_id: Option<i64>,
    /// Why the change happened.
    pub change_reason: String,
    /// Structured context as a JSON document.
    pub metadata: String,
    /// When the entry was written.
    pub created_at: OffsetDateTime,
}

/// Parses a stored lifecycle state string.
///
/// # Errors
///
/// Returns an error if the stored value is not a known state.
pub(crate) fn parse_state(value: &str) -> Result<TripState, PersistenceError> {
    value
        .parse::<TripState>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the stored value is not valid RFC 3339.
pub(crate) fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid stored timestamp '{value}': {e}"))
    })
}

/// Formats a timestamp for storage as RFC 3339.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub(crate) fn format_rfc3339(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}
