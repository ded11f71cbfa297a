// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled trip queries.
//!
//! All queries use Diesel DSL. Rows are mapped back to domain
//! `ScheduledTrip` values before they leave this module; callers never
//! see raw rows.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tripdesk_domain::{ClientContact, Price, ScheduledTrip, TripState, auto_decline_due};

use crate::data_models::{parse_rfc3339, parse_state};
use crate::diesel_schema::scheduled_trips;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full scheduled trip rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = scheduled_trips)]
pub(crate) struct TripRow {
    id: i64,
    client_name: String,
    client_email: String,
    client_phone: String,
    pickup_location: String,
    dropoff_location: String,
    pickup_datetime: String,
    recurrence_config: Option<String>,
    price_cents: Option<i64>,
    state: String,
    acceptance_token: String,
    decline_token: String,
    reviewed_by_id: Option<i64>,
    reviewed_at: Option<String>,
    notes: Option<String>,
    driver_id: Option<i64>,
    created_at: String,
    updated_at: String,
}

/// Maps a stored row back to a domain trip.
///
/// # Errors
///
/// Returns an error if the stored state or any timestamp cannot be parsed.
pub(crate) fn row_into_trip(row: TripRow) -> Result<ScheduledTrip, PersistenceError> {
    let state: TripState = parse_state(&row.state)?;

    Ok(ScheduledTrip {
        trip_id: Some(row.id),
        client: ClientContact::new(row.client_name, row.client_email, row.client_phone),
        pickup_location: row.pickup_location,
        dropoff_location: row.dropoff_location,
        pickup_datetime: parse_rfc3339(&row.pickup_datetime)?,
        recurrence_config: row.recurrence_config,
        price: row.price_cents.map(Price::from_cents),
        state,
        acceptance_token: row.acceptance_token,
        decline_token: row.decline_token,
        reviewed_by_id: row.reviewed_by_id,
        reviewed_at: row.reviewed_at.as_deref().map(parse_rfc3339).transpose()?,
        notes: row.notes,
        driver_id: row.driver_id,
        created_at: parse_rfc3339(&row.created_at)?,
        updated_at: parse_rfc3339(&row.updated_at)?,
    })
}

/// Retrieves a trip by its database identifier.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `trip_id` - The trip identifier
///
/// # Errors
///
/// Returns `TripNotFound` if no trip has this identifier, or an error if
/// the row cannot be reconstructed.
pub fn get_trip(
    conn: &mut SqliteConnection,
    trip_id: i64,
) -> Result<ScheduledTrip, PersistenceError> {
    let result = scheduled_trips::table
        .filter(scheduled_trips::id.eq(trip_id))
        .select(TripRow::as_select())
        .first::<TripRow>(conn);

    let row: TripRow = match result {
        Ok(r) => r,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::TripNotFound(trip_id));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    row_into_trip(row)
}

/// Retrieves a trip by its acceptance token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `token` - The acceptance token from a client response link
///
/// # Errors
///
/// Returns `TokenNotFound` if no trip carries this token. Callers must
/// not reveal to the client whether the token ever existed.
pub fn get_trip_by_acceptance_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<ScheduledTrip, PersistenceError> {
    let result = scheduled_trips::table
        .filter(scheduled_trips::acceptance_token.eq(token))
        .select(TripRow::as_select())
        .first::<TripRow>(conn);

    let row: TripRow = match result {
        Ok(r) => r,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::TokenNotFound);
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    row_into_trip(row)
}

/// Retrieves a trip by its decline token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `token` - The decline token from a client response link
///
/// # Errors
///
/// Returns `TokenNotFound` if no trip carries this token. Callers must
/// not reveal to the client whether the token ever existed.
pub fn get_trip_by_decline_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<ScheduledTrip, PersistenceError> {
    let result = scheduled_trips::table
        .filter(scheduled_trips::decline_token.eq(token))
        .select(TripRow::as_select())
        .first::<TripRow>(conn);

    let row: TripRow = match result {
        Ok(r) => r,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::TokenNotFound);
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    row_into_trip(row)
}

/// Lists trips, optionally filtered to a single lifecycle state.
///
/// Results are ordered by pickup time, soonest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `state` - Restrict results to this state, or `None` for all trips
///
/// # Errors
///
/// Returns an error if rows cannot be retrieved or reconstructed.
pub fn list_trips(
    conn: &mut SqliteConnection,
    state: Option<TripState>,
) -> Result<Vec<ScheduledTrip>, PersistenceError> {
    let rows: Vec<TripRow> = match state {
        Some(state) => scheduled_trips::table
            .filter(scheduled_trips::state.eq(state.as_str()))
            .order(scheduled_trips::pickup_datetime.asc())
            .select(TripRow::as_select())
            .load::<TripRow>(conn)?,
        None => scheduled_trips::table
            .order(scheduled_trips::pickup_datetime.asc())
            .select(TripRow::as_select())
            .load::<TripRow>(conn)?,
    };

    rows.into_iter().map(row_into_trip).collect()
}

/// Lists confirmed trips whose pickup is at or inside the response
/// cutoff, ordered soonest first.
///
/// These are the auto-decline sweep's candidates. The state filter runs
/// in SQL; the cutoff comparison runs on parsed timestamps because the
/// stored RFC 3339 text does not order lexicographically across
/// fractional-second precision.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The sweep's wall-clock reading
///
/// # Errors
///
/// Returns an error if rows cannot be retrieved or reconstructed.
pub fn list_sweep_candidates(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<Vec<ScheduledTrip>, PersistenceError> {
    let rows: Vec<TripRow> = scheduled_trips::table
        .filter(scheduled_trips::state.eq(TripState::Confirmed.as_str()))
        .order(scheduled_trips::pickup_datetime.asc())
        .select(TripRow::as_select())
        .load::<TripRow>(conn)?;

    let mut candidates: Vec<ScheduledTrip> = Vec::new();
    for row in rows {
        let trip: ScheduledTrip = row_into_trip(row)?;
        if auto_decline_due(trip.pickup_datetime, now) {
            candidates.push(trip);
        }
    }

    Ok(candidates)
}
