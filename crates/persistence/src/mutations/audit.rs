// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log persistence.
//!
//! Audit rows are append-only. They are inserted here and never touched
//! again; there are no update or delete mutations for this table.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;
use tripdesk_audit::AuditEntry;

use crate::data_models::format_rfc3339;
use crate::diesel_schema::scheduled_trip_audit_logs;
use crate::error::PersistenceError;
use crate::sqlite;

/// Inserts one audit log row for a trip.
///
/// Callers are responsible for running this inside the same transaction
/// as the state change it records. The actor kind travels inside the
/// entry's metadata JSON; only the staff identifier gets its own column.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `trip_id` - The trip the entry belongs to
/// * `entry` - The audit entry to persist
/// * `recorded_at` - The timestamp to store with the entry
///
/// # Returns
///
/// The log row ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn insert_audit_log(
    conn: &mut SqliteConnection,
    trip_id: i64,
    entry: &AuditEntry,
    recorded_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_rfc3339(recorded_at)?;

    diesel::insert_into(scheduled_trip_audit_logs::table)
        .values((
            scheduled_trip_audit_logs::scheduled_trip_id.eq(trip_id),
            scheduled_trip_audit_logs::previous_state.eq(entry
                .previous_state
                .map(|state| state.as_str())),
            scheduled_trip_audit_logs::new_state.eq(entry.new_state.as_str()),
            scheduled_trip_audit_logs::changed_by_id.eq(entry.actor.changed_by_id()),
            scheduled_trip_audit_logs::change_reason.eq(&entry.reason),
            scheduled_trip_audit_logs::metadata.eq(&entry.metadata),
            scheduled_trip_audit_logs::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let log_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    debug!(
        log_id,
        trip_id,
        new_state = entry.new_state.as_str(),
        "Inserted audit log row"
    );

    Ok(log_id)
}
