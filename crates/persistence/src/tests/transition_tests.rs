// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_test_trip, test_now};
use crate::{PersistenceError, SqlitePersistence};
use time::Duration;
use tripdesk::{TransitionRequest, TransitionResult, TripEvent, apply, creation_entry};
use tripdesk_domain::{Price, ScheduledTrip, TripState};

/// Persists a fresh pending trip and returns its id.
fn setup_trip(
    persistence: &mut SqlitePersistence,
    acceptance_token: &str,
    decline_token: &str,
) -> i64 {
    let trip: ScheduledTrip = create_test_trip(acceptance_token, decline_token);
    persistence.create_trip(&trip, &creation_entry()).unwrap()
}

/// Computes a staff confirmation of `trip` at five minutes past the test
/// clock.
fn confirm_result(trip: &ScheduledTrip) -> TransitionResult {
    apply(
        trip,
        TripEvent::Confirm {
            price: Price::parse("45.00").unwrap(),
            notes: Some(String::from("Two bags")),
        },
        TransitionRequest::staff(7, None),
        test_now() + Duration::minutes(5),
    )
    .unwrap()
}

#[test]
fn test_persist_confirm_updates_row() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-confirm", "decline-confirm");
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();

    let result: TransitionResult = confirm_result(&stored);
    persistence
        .persist_transition(trip_id, TripState::Pending, &result)
        .unwrap();

    let updated: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    assert_eq!(updated.state, TripState::Confirmed);
    assert_eq!(updated.price, Some(Price::parse("45.00").unwrap()));
    assert_eq!(updated.notes.as_deref(), Some("Two bags"));
    assert_eq!(updated.reviewed_by_id, Some(7));
    assert_eq!(updated.reviewed_at, Some(test_now() + Duration::minutes(5)));
    assert_eq!(updated.updated_at, test_now() + Duration::minutes(5));

    // Creation-time fields are untouched by the transition.
    assert_eq!(updated.created_at, test_now());
    assert_eq!(updated.acceptance_token, "accept-confirm");
    assert_eq!(updated.decline_token, "decline-confirm");
}

#[test]
fn test_persist_accept_after_confirm() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-chain", "decline-chain");
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();

    persistence
        .persist_transition(trip_id, TripState::Pending, &confirm_result(&stored))
        .unwrap();

    // Accept one hour in: pickup is still five hours away, well outside
    // the response cutoff.
    let confirmed: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    let accept: TransitionResult = apply(
        &confirmed,
        TripEvent::Accept,
        TransitionRequest::client(),
        test_now() + Duration::hours(1),
    )
    .unwrap();
    persistence
        .persist_transition(trip_id, TripState::Confirmed, &accept)
        .unwrap();

    let updated: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    assert_eq!(updated.state, TripState::Accepted);
    assert_eq!(updated.updated_at, test_now() + Duration::hours(1));

    // The confirmation's review fields survive the acceptance.
    assert_eq!(updated.reviewed_by_id, Some(7));
    assert_eq!(updated.price, Some(Price::parse("45.00").unwrap()));
}

#[test]
fn test_persist_staff_decline_from_pending() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-decline", "decline-decline");
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();

    let result: TransitionResult = apply(
        &stored,
        TripEvent::Decline,
        TransitionRequest::staff(9, Some(String::from("Client withdrew the request"))),
        test_now() + Duration::minutes(10),
    )
    .unwrap();
    persistence
        .persist_transition(trip_id, TripState::Pending, &result)
        .unwrap();

    let updated: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    assert_eq!(updated.state, TripState::Declined);
    assert_eq!(updated.price, None);
    assert_eq!(updated.reviewed_by_id, None);
}

#[test]
fn test_persist_auto_decline_from_confirmed() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-sweep", "decline-sweep");
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();

    persistence
        .persist_transition(trip_id, TripState::Pending, &confirm_result(&stored))
        .unwrap();

    // Five hours in the pickup is only one hour away, inside the cutoff.
    let confirmed: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    let result: TransitionResult = apply(
        &confirmed,
        TripEvent::AutoDecline,
        TransitionRequest::sweep(),
        test_now() + Duration::hours(5),
    )
    .unwrap();
    persistence
        .persist_transition(trip_id, TripState::Confirmed, &result)
        .unwrap();

    let updated: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    assert_eq!(updated.state, TripState::AutoDeclined);
}

#[test]
fn test_stale_transition_is_state_conflict() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-race", "decline-race");
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();

    // Two callers compute transitions from the same pending snapshot.
    let first: TransitionResult = confirm_result(&stored);
    let second: TransitionResult = apply(
        &stored,
        TripEvent::Decline,
        TransitionRequest::staff(9, None),
        test_now() + Duration::minutes(6),
    )
    .unwrap();

    persistence
        .persist_transition(trip_id, TripState::Pending, &first)
        .unwrap();

    let error = persistence
        .persist_transition(trip_id, TripState::Pending, &second)
        .unwrap_err();
    assert_eq!(
        error,
        PersistenceError::StateConflict {
            trip_id,
            expected: String::from("pending"),
            actual: String::from("confirmed"),
        }
    );
}

#[test]
fn test_lost_race_leaves_no_trace() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-trace", "decline-trace");
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();

    let winner: TransitionResult = confirm_result(&stored);
    let loser: TransitionResult = apply(
        &stored,
        TripEvent::Decline,
        TransitionRequest::staff(9, None),
        test_now() + Duration::minutes(6),
    )
    .unwrap();

    persistence
        .persist_transition(trip_id, TripState::Pending, &winner)
        .unwrap();
    persistence
        .persist_transition(trip_id, TripState::Pending, &loser)
        .unwrap_err();

    // The losing write rolled back entirely: the row still shows the
    // winner's transition and no extra audit entry was appended.
    let updated: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    assert_eq!(updated.state, TripState::Confirmed);
    assert_eq!(updated.updated_at, test_now() + Duration::minutes(5));
    assert_eq!(persistence.get_audit_timeline(trip_id).unwrap().len(), 2);
}

#[test]
fn test_transition_on_missing_trip_is_trip_not_found() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip: ScheduledTrip = create_test_trip("accept-ghost", "decline-ghost");
    let result: TransitionResult = confirm_result(&trip);

    let error = persistence
        .persist_transition(9999, TripState::Pending, &result)
        .unwrap_err();
    assert_eq!(error, PersistenceError::TripNotFound(9999));
}
