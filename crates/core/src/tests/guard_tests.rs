// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the wall-clock guards on accept and auto-decline.
//!
//! The two guards are exact complements of each other around the two hour
//! cutoff before pickup, so the boundary cases here matter: at the cutoff a
//! trip is no longer acceptable and already sweep-eligible.

use crate::{CoreError, TransitionRequest, TripEvent, apply};
use time::Duration;
use tripdesk_domain::{CLIENT_RESPONSE_CUTOFF, DomainError, ScheduledTrip};

use super::helpers::{create_confirmed_trip, create_pending_trip, test_now};

#[test]
fn test_accept_fails_inside_cutoff() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, Duration::hours(1));

    let result = apply(&trip, TripEvent::Accept, TransitionRequest::client(), now);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::AcceptanceWindowClosed { .. }
    ));
}

#[test]
fn test_accept_fails_exactly_at_cutoff() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, CLIENT_RESPONSE_CUTOFF);

    let result = apply(&trip, TripEvent::Accept, TransitionRequest::client(), now);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::AcceptanceWindowClosed { .. }
    ));
}

#[test]
fn test_accept_succeeds_just_outside_cutoff() {
    let now = test_now();
    let trip: ScheduledTrip =
        create_confirmed_trip(now, CLIENT_RESPONSE_CUTOFF + Duration::seconds(1));

    let result = apply(&trip, TripEvent::Accept, TransitionRequest::client(), now);

    assert!(result.is_ok());
}

#[test]
fn test_accept_fails_after_pickup_has_passed() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, Duration::hours(-3));

    let result = apply(&trip, TripEvent::Accept, TransitionRequest::client(), now);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::AcceptanceWindowClosed { .. }
    ));
}

#[test]
fn test_auto_decline_fails_outside_cutoff() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, Duration::days(3));

    let result = apply(
        &trip,
        TripEvent::AutoDecline,
        TransitionRequest::sweep(),
        now,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::AutoDeclineNotDue { .. }
    ));
}

#[test]
fn test_auto_decline_succeeds_exactly_at_cutoff() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, CLIENT_RESPONSE_CUTOFF);

    let result = apply(
        &trip,
        TripEvent::AutoDecline,
        TransitionRequest::sweep(),
        now,
    );

    assert!(result.is_ok());
}

#[test]
fn test_auto_decline_succeeds_after_pickup_has_passed() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, Duration::hours(-3));

    let result = apply(
        &trip,
        TripEvent::AutoDecline,
        TransitionRequest::sweep(),
        now,
    );

    assert!(result.is_ok());
}

#[test]
fn test_no_pickup_offset_is_both_acceptable_and_sweep_eligible() {
    // At every offset exactly one of accept and auto-decline passes its
    // guard on a confirmed trip.
    let now = test_now();
    let offsets = [
        Duration::hours(-3),
        Duration::ZERO,
        Duration::hours(1),
        CLIENT_RESPONSE_CUTOFF,
        CLIENT_RESPONSE_CUTOFF + Duration::seconds(1),
        Duration::days(3),
    ];

    for offset in offsets {
        let trip: ScheduledTrip = create_confirmed_trip(now, offset);

        let accept_ok: bool =
            apply(&trip, TripEvent::Accept, TransitionRequest::client(), now).is_ok();
        let sweep_ok: bool = apply(
            &trip,
            TripEvent::AutoDecline,
            TransitionRequest::sweep(),
            now,
        )
        .is_ok();

        assert_ne!(
            accept_ok, sweep_ok,
            "offset {offset} should satisfy exactly one guard"
        );
    }
}

#[test]
fn test_transition_table_checked_before_clock_guard() {
    // A pending trip inside the cutoff fails on the transition table, not
    // the clock guard: acceptance requires prior confirmation.
    let now = test_now();
    let trip: ScheduledTrip = create_pending_trip(now, Duration::hours(1));

    let result = apply(&trip, TripEvent::Accept, TransitionRequest::client(), now);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}
