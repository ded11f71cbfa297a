// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.
//!
//! Audit rows are never updated or deleted. Reading a trip's timeline in
//! insertion order reproduces its entire lifecycle history.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tripdesk_domain::TripState;

use crate::data_models::{TripAuditRecord, parse_rfc3339, parse_state};
use crate::diesel_schema::scheduled_trip_audit_logs;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit log rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = scheduled_trip_audit_logs)]
struct AuditLogRow {
    id: i64,
    scheduled_trip_id: i64,
    previous_state: Option<String>,
    new_state: String,
    changed_by_id: Option<i64>,
    change_reason: String,
    metadata: String,
    created_at: String,
}

fn row_into_record(row: AuditLogRow) -> Result<TripAuditRecord, PersistenceError> {
    let previous_state: Option<TripState> =
        row.previous_state.as_deref().map(parse_state).transpose()?;

    Ok(TripAuditRecord {
        id: row.id,
        scheduled_trip_id: row.scheduled_trip_id,
        previous_state,
        new_state: parse_state(&row.new_state)?,
        changed_by_id: row.changed_by_id,
        change_reason: row.change_reason,
        metadata: row.metadata,
        created_at: parse_rfc3339(&row.created_at)?,
    })
}

/// Retrieves the ordered audit timeline for a trip.
///
/// Entries come back oldest first. A persisted trip always has at least
/// its creation entry; an empty result means the trip does not exist.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `trip_id` - The trip whose timeline to read
///
/// # Errors
///
/// Returns an error if rows cannot be retrieved or reconstructed.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    trip_id: i64,
) -> Result<Vec<TripAuditRecord>, PersistenceError> {
    let rows: Vec<AuditLogRow> = scheduled_trip_audit_logs::table
        .filter(scheduled_trip_audit_logs::scheduled_trip_id.eq(trip_id))
        .order(scheduled_trip_audit_logs::id.asc())
        .select(AuditLogRow::as_select())
        .load::<AuditLogRow>(conn)?;

    rows.into_iter().map(row_into_record).collect()
}
