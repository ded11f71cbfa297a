// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tripdesk_persistence::SqlitePersistence;

use crate::{
    ApiResult, ConfirmTripRequest, ConfirmTripResponse, CreateTripRequest, CreateTripResponse,
    Role, StaffActor, confirm_trip, create_trip,
};

pub fn create_test_manager() -> StaffActor {
    StaffActor::new(1, Role::Manager)
}

pub fn create_test_dispatcher() -> StaffActor {
    StaffActor::new(2, Role::Dispatcher)
}

pub fn test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Formats `now + hours_ahead` as an RFC 3339 pickup timestamp.
pub fn pickup_in_hours(hours_ahead: i64) -> String {
    let pickup: OffsetDateTime = OffsetDateTime::now_utc() + time::Duration::hours(hours_ahead);
    pickup.format(&Rfc3339).expect("Valid timestamp")
}

pub fn create_valid_trip_request() -> CreateTripRequest {
    CreateTripRequest {
        client_name: String::from("Dana Whitfield"),
        client_email: String::from("dana.whitfield@example.com"),
        client_phone: String::from("555-0142"),
        pickup_location: String::from("12 Harbor Way"),
        dropoff_location: String::from("Mercy General Hospital"),
        pickup_datetime: pickup_in_hours(72),
        recurrence_config: None,
    }
}

/// Creates a pending trip with pickup 72 hours out and returns the
/// creation response, which carries both response tokens.
pub fn seed_pending_trip(persistence: &mut SqlitePersistence) -> CreateTripResponse {
    seed_pending_trip_at(persistence, 72)
}

/// Creates a pending trip with the given pickup offset.
pub fn seed_pending_trip_at(
    persistence: &mut SqlitePersistence,
    hours_ahead: i64,
) -> CreateTripResponse {
    let mut request: CreateTripRequest = create_valid_trip_request();
    request.pickup_datetime = pickup_in_hours(hours_ahead);
    let result: ApiResult<CreateTripResponse> =
        create_trip(persistence, &request).expect("Failed to create trip");
    result.response
}

/// Creates a trip and confirms it at 45.00. Returns the creation
/// response so callers keep both tokens; the stored trip is `confirmed`.
pub fn seed_confirmed_trip(persistence: &mut SqlitePersistence) -> CreateTripResponse {
    seed_confirmed_trip_at(persistence, 72)
}

/// Creates and confirms a trip with the given pickup offset.
///
/// Confirmation carries no clock guard, so this works even for pickups
/// already inside the response cutoff.
pub fn seed_confirmed_trip_at(
    persistence: &mut SqlitePersistence,
    hours_ahead: i64,
) -> CreateTripResponse {
    let created: CreateTripResponse = seed_pending_trip_at(persistence, hours_ahead);
    let request: ConfirmTripRequest = ConfirmTripRequest {
        trip_id: created.trip.trip_id,
        price: String::from("45.00"),
        notes: None,
    };
    let manager: StaffActor = create_test_manager();
    let _confirmed: ApiResult<ConfirmTripResponse> =
        confirm_trip(persistence, &request, &manager).expect("Failed to confirm trip");
    created
}
