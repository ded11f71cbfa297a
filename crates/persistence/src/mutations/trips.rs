// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled trip mutations.
//!
//! Every mutation here writes the trip row and its audit row inside a
//! single transaction. A trip row is never written without an audit row
//! describing the change, and a failed write leaves neither behind.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};
use tripdesk::TransitionResult;
use tripdesk_audit::AuditEntry;
use tripdesk_domain::{ScheduledTrip, TripState};

use crate::data_models::format_rfc3339;
use crate::diesel_schema::scheduled_trips;
use crate::error::PersistenceError;
use crate::mutations::audit::insert_audit_log;
use crate::sqlite;

/// Inserts a new trip together with its creation audit entry.
///
/// Both rows are written in one immediate transaction. If either insert
/// fails (a token collision, for instance) the whole creation rolls back.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `trip` - The trip to persist; its `trip_id` is ignored
/// * `creation_entry` - The audit entry recording the creation
///
/// # Returns
///
/// The trip ID assigned by the database.
///
/// # Errors
///
/// Returns `DuplicateToken` if either response token collides with an
/// existing trip, or an error if persistence fails.
pub fn create_trip(
    conn: &mut SqliteConnection,
    trip: &ScheduledTrip,
    creation_entry: &AuditEntry,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let pickup_datetime: String = format_rfc3339(trip.pickup_datetime)?;
        let created_at: String = format_rfc3339(trip.created_at)?;
        let updated_at: String = format_rfc3339(trip.updated_at)?;

        diesel::insert_into(scheduled_trips::table)
            .values((
                scheduled_trips::client_name.eq(&trip.client.name),
                scheduled_trips::client_email.eq(&trip.client.email),
                scheduled_trips::client_phone.eq(&trip.client.phone),
                scheduled_trips::pickup_location.eq(&trip.pickup_location),
                scheduled_trips::dropoff_location.eq(&trip.dropoff_location),
                scheduled_trips::pickup_datetime.eq(pickup_datetime),
                scheduled_trips::recurrence_config.eq(trip.recurrence_config.as_deref()),
                scheduled_trips::price_cents.eq(trip.price.map(|p| p.cents())),
                scheduled_trips::state.eq(trip.state.as_str()),
                scheduled_trips::acceptance_token.eq(&trip.acceptance_token),
                scheduled_trips::decline_token.eq(&trip.decline_token),
                scheduled_trips::reviewed_by_id.eq(trip.reviewed_by_id),
                scheduled_trips::notes.eq(trip.notes.as_deref()),
                scheduled_trips::driver_id.eq(trip.driver_id),
                scheduled_trips::created_at.eq(created_at),
                scheduled_trips::updated_at.eq(updated_at),
            ))
            .execute(conn)?;

        let trip_id: i64 = sqlite::get_last_insert_rowid(conn)?;

        insert_audit_log(conn, trip_id, creation_entry, trip.created_at)?;

        info!(
            trip_id,
            state = trip.state.as_str(),
            "Persisted new scheduled trip"
        );

        Ok(trip_id)
    })
}

/// Applies an evaluated transition to the stored trip.
///
/// The update is conditional on the trip still being in `expected_state`.
/// When two actors race to resolve the same trip, the first write wins;
/// the loser's update matches zero rows and this function reports a
/// `StateConflict` carrying the state the winner left behind. The audit
/// row is inserted in the same transaction as the update, so the trail
/// can never lag the trip.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `trip_id` - The trip to update
/// * `expected_state` - The state the trip had when the transition was evaluated
/// * `result` - The evaluated transition to persist
///
/// # Errors
///
/// Returns `StateConflict` if the trip changed state since it was read,
/// `TripNotFound` if it no longer exists, or an error if persistence fails.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    trip_id: i64,
    expected_state: TripState,
    result: &TransitionResult,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: &ScheduledTrip = &result.updated_trip;
        let reviewed_at: Option<String> = match updated.reviewed_at {
            Some(ts) => Some(format_rfc3339(ts)?),
            None => None,
        };
        let updated_at: String = format_rfc3339(updated.updated_at)?;

        let rows_affected: usize = diesel::update(scheduled_trips::table)
            .filter(scheduled_trips::id.eq(trip_id))
            .filter(scheduled_trips::state.eq(expected_state.as_str()))
            .set((
                scheduled_trips::state.eq(updated.state.as_str()),
                scheduled_trips::price_cents.eq(updated.price.map(|p| p.cents())),
                scheduled_trips::notes.eq(updated.notes.as_deref()),
                scheduled_trips::reviewed_by_id.eq(updated.reviewed_by_id),
                scheduled_trips::reviewed_at.eq(reviewed_at),
                scheduled_trips::updated_at.eq(updated_at),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            // Distinguish a lost race from a missing trip, inside the
            // same transaction so the answer cannot shift under us.
            let current: Option<String> = scheduled_trips::table
                .filter(scheduled_trips::id.eq(trip_id))
                .select(scheduled_trips::state)
                .first::<String>(conn)
                .optional()?;

            return Err(current.map_or(
                PersistenceError::TripNotFound(trip_id),
                |actual| PersistenceError::StateConflict {
                    trip_id,
                    expected: expected_state.as_str().to_string(),
                    actual,
                },
            ));
        }

        insert_audit_log(conn, trip_id, &result.audit_entry, updated.updated_at)?;

        debug!(
            trip_id,
            from = expected_state.as_str(),
            to = updated.state.as_str(),
            "Persisted trip transition"
        );

        Ok(())
    })
}
