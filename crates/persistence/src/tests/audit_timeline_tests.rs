// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_test_trip, test_now};
use crate::{SqlitePersistence, TripAuditRecord};
use time::Duration;
use tripdesk::{
    AUTO_DECLINE_REASON, CREATION_REASON, TransitionRequest, TransitionResult, TripEvent, apply,
    creation_entry,
};
use tripdesk_audit::timeline_is_connected;
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

/// Confirms the stored trip as staff member 7 with the given reason.
fn confirm_trip(persistence: &mut SqlitePersistence, trip_id: i64, reason: Option<String>) {
    let stored: ScheduledTrip = persistence.get_trip(trip_id).unwrap();
    let result: TransitionResult = apply(
        &stored,
        TripEvent::Confirm {
            price: Price::parse("45.00").unwrap(),
            notes: None,
        },
        TransitionRequest::staff(7, reason),
        test_now() + Duration::minutes(5),
    )
    .unwrap();
    persistence
        .persist_transition(trip_id, TripState::Pending, &result)
        .unwrap();
}

#[test]
fn test_creation_writes_first_timeline_entry() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-first", "decline-first");

    let timeline: Vec<TripAuditRecord> = persistence.get_audit_timeline(trip_id).unwrap();
    assert_eq!(timeline.len(), 1);

    let entry: &TripAuditRecord = &timeline[0];
    assert_eq!(entry.scheduled_trip_id, trip_id);
    assert_eq!(entry.previous_state, None);
    assert_eq!(entry.new_state, TripState::Pending);
    assert_eq!(entry.changed_by_id, None);
    assert_eq!(entry.change_reason, CREATION_REASON);
    assert!(entry.metadata.contains("\"actor\":\"client\""));
    assert_eq!(entry.created_at, test_now());
}

#[test]
fn test_full_lifecycle_timeline_is_connected() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-walk", "decline-walk");
    confirm_trip(&mut persistence, trip_id, None);

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

    let timeline: Vec<TripAuditRecord> = persistence.get_audit_timeline(trip_id).unwrap();
    assert_eq!(timeline.len(), 3);

    let transitions: Vec<(Option<TripState>, TripState)> = timeline
        .iter()
        .map(|entry| (entry.previous_state, entry.new_state))
        .collect();
    assert!(timeline_is_connected(&transitions));
    assert_eq!(timeline[2].new_state, TripState::Accepted);
}

#[test]
fn test_transition_entry_records_actor_and_reason() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-actor", "decline-actor");
    confirm_trip(
        &mut persistence,
        trip_id,
        Some(String::from("Quoted at standard rate")),
    );

    let timeline: Vec<TripAuditRecord> = persistence.get_audit_timeline(trip_id).unwrap();
    let entry: &TripAuditRecord = &timeline[1];

    assert_eq!(entry.previous_state, Some(TripState::Pending));
    assert_eq!(entry.new_state, TripState::Confirmed);
    assert_eq!(entry.changed_by_id, Some(7));
    assert_eq!(entry.change_reason, "Quoted at standard rate");
    assert!(entry.metadata.contains("\"actor\":\"staff\""));
    assert!(entry.metadata.contains("\"price\":\"45.00\""));
    assert_eq!(entry.created_at, test_now() + Duration::minutes(5));
}

#[test]
fn test_sweep_entry_has_no_staff_id() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let trip_id: i64 = setup_trip(&mut persistence, "accept-sweeper", "decline-sweeper");
    confirm_trip(&mut persistence, trip_id, None);

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

    let timeline: Vec<TripAuditRecord> = persistence.get_audit_timeline(trip_id).unwrap();
    let entry: &TripAuditRecord = &timeline[2];

    assert_eq!(entry.new_state, TripState::AutoDeclined);
    assert_eq!(entry.changed_by_id, None);
    assert_eq!(entry.change_reason, AUTO_DECLINE_REASON);
    assert!(entry.metadata.contains("\"actor\":\"sweep\""));
    assert!(entry.metadata.contains("\"decided_at\""));
}

#[test]
fn test_timelines_are_scoped_per_trip() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let first_id: i64 = setup_trip(&mut persistence, "accept-scope-a", "decline-scope-a");
    let second_id: i64 = setup_trip(&mut persistence, "accept-scope-b", "decline-scope-b");
    confirm_trip(&mut persistence, first_id, None);

    assert_eq!(persistence.get_audit_timeline(first_id).unwrap().len(), 2);
    assert_eq!(persistence.get_audit_timeline(second_id).unwrap().len(), 1);
}

#[test]
fn test_timeline_for_unknown_trip_is_empty() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.get_audit_timeline(4242).unwrap().is_empty());
}
