// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for lifecycle constraint violations and full walks.
//!
//! These tests verify that out-of-order and terminal-state events are
//! rejected with specific error kinds, and that chained transitions produce
//! an unbroken audit timeline.

use crate::{
    CoreError, TransitionRequest, TransitionResult, TripEvent, apply, creation_entry,
};
use time::Duration;
use tripdesk_audit::{AuditEntry, timeline_is_connected};
use tripdesk_domain::{DomainError, Price, ScheduledTrip, TripState};

use super::helpers::{create_confirmed_trip, create_pending_trip, test_now};

fn confirm_event() -> TripEvent {
    TripEvent::Confirm {
        price: Price::from_cents(4500),
        notes: None,
    }
}

// ============================================================================
// Out-of-order events
// ============================================================================

#[test]
fn test_accept_from_pending_is_rejected() {
    let now = test_now();
    let trip: ScheduledTrip = create_pending_trip(now, Duration::days(3));

    let result = apply(&trip, TripEvent::Accept, TransitionRequest::client(), now);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}

#[test]
fn test_auto_decline_from_pending_is_rejected() {
    let now = test_now();
    let trip: ScheduledTrip = create_pending_trip(now, Duration::hours(1));

    let result = apply(
        &trip,
        TripEvent::AutoDecline,
        TransitionRequest::sweep(),
        now,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}

#[test]
fn test_confirm_from_confirmed_is_rejected() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, Duration::days(3));

    let result = apply(
        &trip,
        confirm_event(),
        TransitionRequest::staff(7, None),
        now,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}

// ============================================================================
// Terminal states
// ============================================================================

#[test]
fn test_no_event_moves_an_accepted_trip() {
    let now = test_now();
    let mut trip: ScheduledTrip = create_confirmed_trip(now, Duration::days(3));
    trip.state = TripState::Accepted;

    for event in [
        confirm_event(),
        TripEvent::Accept,
        TripEvent::Decline,
        TripEvent::AutoDecline,
    ] {
        let result = apply(&trip, event, TransitionRequest::staff(7, None), now);
        assert!(matches!(
            result.unwrap_err(),
            CoreError::DomainViolation(DomainError::InvalidTransition { .. })
        ));
    }
}

#[test]
fn test_no_event_moves_a_declined_trip() {
    let now = test_now();
    let mut trip: ScheduledTrip = create_pending_trip(now, Duration::days(3));
    trip.state = TripState::Declined;

    for event in [confirm_event(), TripEvent::Accept, TripEvent::Decline] {
        let result = apply(&trip, event, TransitionRequest::staff(7, None), now);
        assert!(matches!(
            result.unwrap_err(),
            CoreError::DomainViolation(DomainError::InvalidTransition { .. })
        ));
    }
}

#[test]
fn test_no_event_moves_an_auto_declined_trip() {
    let now = test_now();
    let mut trip: ScheduledTrip = create_confirmed_trip(now, Duration::hours(1));
    trip.state = TripState::AutoDeclined;

    for event in [confirm_event(), TripEvent::Accept, TripEvent::Decline] {
        let result = apply(&trip, event, TransitionRequest::client(), now);
        assert!(matches!(
            result.unwrap_err(),
            CoreError::DomainViolation(DomainError::InvalidTransition { .. })
        ));
    }
}

// ============================================================================
// Full walks
// ============================================================================

#[test]
fn test_full_acceptance_walk_leaves_connected_timeline() {
    let now = test_now();
    let pending: ScheduledTrip = create_pending_trip(now, Duration::days(3));

    let confirmed: TransitionResult = apply(
        &pending,
        confirm_event(),
        TransitionRequest::staff(7, None),
        now + Duration::minutes(5),
    )
    .unwrap();
    let accepted: TransitionResult = apply(
        &confirmed.updated_trip,
        TripEvent::Accept,
        TransitionRequest::client(),
        now + Duration::minutes(10),
    )
    .unwrap();

    assert_eq!(accepted.updated_trip.state, TripState::Accepted);

    let entries: Vec<AuditEntry> = vec![
        creation_entry(),
        confirmed.audit_entry,
        accepted.audit_entry,
    ];
    let transitions: Vec<(Option<TripState>, TripState)> = entries
        .iter()
        .map(|e| (e.previous_state, e.new_state))
        .collect();

    assert!(timeline_is_connected(&transitions));
}

#[test]
fn test_full_decline_walk_leaves_connected_timeline() {
    let now = test_now();
    let pending: ScheduledTrip = create_pending_trip(now, Duration::days(3));

    let confirmed: TransitionResult = apply(
        &pending,
        confirm_event(),
        TransitionRequest::staff(7, None),
        now,
    )
    .unwrap();
    let declined: TransitionResult = apply(
        &confirmed.updated_trip,
        TripEvent::Decline,
        TransitionRequest::client(),
        now + Duration::minutes(1),
    )
    .unwrap();

    assert_eq!(declined.updated_trip.state, TripState::Declined);

    let transitions: Vec<(Option<TripState>, TripState)> = [
        creation_entry(),
        confirmed.audit_entry,
        declined.audit_entry,
    ]
    .iter()
    .map(|e| (e.previous_state, e.new_state))
    .collect();

    assert!(timeline_is_connected(&transitions));
}

#[test]
fn test_second_accept_fails_after_first_succeeds() {
    let now = test_now();
    let trip: ScheduledTrip = create_confirmed_trip(now, Duration::days(3));

    let first: TransitionResult =
        apply(&trip, TripEvent::Accept, TransitionRequest::client(), now).unwrap();
    let second = apply(
        &first.updated_trip,
        TripEvent::Accept,
        TransitionRequest::client(),
        now,
    );

    assert!(matches!(
        second.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}
