// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use tripdesk_domain::TripState;

/// The kind of entity that drove a state change.
///
/// Trips are moved through their lifecycle by three kinds of actor, and
/// every audit entry records which one acted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// An authenticated staff member.
    Staff,
    /// The client, acting through an emailed response token.
    Client,
    /// The periodic auto-decline sweep.
    Sweep,
}

impl ActorKind {
    /// Returns the string representation of this actor kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Client => "client",
            Self::Sweep => "sweep",
        }
    }
}

/// The entity that drove a state change.
///
/// Only staff actors carry an identifier. Clients act anonymously through
/// response tokens and the sweep is a system process, so for both of those
/// `staff_id` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditActor {
    /// Which kind of entity acted.
    pub kind: ActorKind,
    /// The acting staff member, when `kind` is `Staff`.
    pub staff_id: Option<i64>,
}

impl AuditActor {
    /// Creates an actor for an authenticated staff member.
    ///
    /// # Arguments
    ///
    /// * `staff_id` - The staff member's identifier
    #[must_use]
    pub const fn staff(staff_id: i64) -> Self {
        Self {
            kind: ActorKind::Staff,
            staff_id: Some(staff_id),
        }
    }

    /// Creates an actor for the anonymous client.
    #[must_use]
    pub const fn client() -> Self {
        Self {
            kind: ActorKind::Client,
            staff_id: None,
        }
    }

    /// Creates an actor for the auto-decline sweep.
    #[must_use]
    pub const fn sweep() -> Self {
        Self {
            kind: ActorKind::Sweep,
            staff_id: None,
        }
    }

    /// Returns the staff identifier recorded as `changed_by_id`, if any.
    #[must_use]
    pub const fn changed_by_id(&self) -> Option<i64> {
        self.staff_id
    }
}

/// An immutable audit entry describing one state change of one trip.
///
/// Every successful state change must produce exactly one audit entry,
/// written in the same transaction as the change itself. Entries capture:
/// - The state before the change (`None` only for the creation entry)
/// - The state after the change
/// - Who drove the change (actor)
/// - Why it happened (reason)
/// - Structured context (metadata, a JSON document)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// The state before the change. `None` only when the entry records
    /// the trip's creation.
    pub previous_state: Option<TripState>,
    /// The state after the change.
    pub new_state: TripState,
    /// Who drove the change.
    pub actor: AuditActor,
    /// Why the change happened.
    pub reason: String,
    /// Structured context as a JSON document.
    pub metadata: String,
}

impl AuditEntry {
    /// Creates a new `AuditEntry`.
    ///
    /// Once created, an audit entry is immutable.
    ///
    /// # Arguments
    ///
    /// * `previous_state` - The state before the change, `None` at creation
    /// * `new_state` - The state after the change
    /// * `actor` - Who drove the change
    /// * `reason` - Why the change happened
    /// * `metadata` - Structured context as a JSON document
    #[must_use]
    pub const fn new(
        previous_state: Option<TripState>,
        new_state: TripState,
        actor: AuditActor,
        reason: String,
        metadata: String,
    ) -> Self {
        Self {
            previous_state,
            new_state,
            actor,
            reason,
            metadata,
        }
    }

    /// Returns true if this entry records the trip's creation.
    #[must_use]
    pub const fn is_creation(&self) -> bool {
        self.previous_state.is_none()
    }
}

/// Checks that a trip's audit timeline forms an unbroken chain.
///
/// `transitions` must be ordered oldest first, each item being the
/// `(previous_state, new_state)` pair of one entry. The chain is unbroken
/// when the first entry has no previous state (it records creation) and
/// every later entry's previous state equals the state the entry before
/// it arrived at. An empty timeline is not connected; every persisted
/// trip has at least its creation entry.
#[must_use]
pub fn timeline_is_connected(transitions: &[(Option<TripState>, TripState)]) -> bool {
    let Some(((first_previous, first_state), rest)) = transitions.split_first() else {
        return false;
    };

    if first_previous.is_some() {
        return false;
    }

    let mut last_state: TripState = *first_state;
    for (previous, new_state) in rest {
        if *previous != Some(last_state) {
            return false;
        }
        last_state = *new_state;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_actor_carries_id() {
        let actor: AuditActor = AuditActor::staff(42);

        assert_eq!(actor.kind, ActorKind::Staff);
        assert_eq!(actor.changed_by_id(), Some(42));
    }

    #[test]
    fn test_client_and_sweep_actors_have_no_id() {
        assert_eq!(AuditActor::client().changed_by_id(), None);
        assert_eq!(AuditActor::sweep().changed_by_id(), None);
        assert_eq!(AuditActor::client().kind, ActorKind::Client);
        assert_eq!(AuditActor::sweep().kind, ActorKind::Sweep);
    }

    #[test]
    fn test_actor_kind_strings() {
        assert_eq!(ActorKind::Staff.as_str(), "staff");
        assert_eq!(ActorKind::Client.as_str(), "client");
        assert_eq!(ActorKind::Sweep.as_str(), "sweep");
    }

    #[test]
    fn test_audit_entry_creation_requires_all_fields() {
        let entry: AuditEntry = AuditEntry::new(
            Some(TripState::Pending),
            TripState::Confirmed,
            AuditActor::staff(7),
            String::from("Confirmed by staff"),
            String::from("{\"actor\":\"staff\"}"),
        );

        assert_eq!(entry.previous_state, Some(TripState::Pending));
        assert_eq!(entry.new_state, TripState::Confirmed);
        assert_eq!(entry.actor, AuditActor::staff(7));
        assert_eq!(entry.reason, "Confirmed by staff");
        assert_eq!(entry.metadata, "{\"actor\":\"staff\"}");
    }

    #[test]
    fn test_creation_entry_has_no_previous_state() {
        let entry: AuditEntry = AuditEntry::new(
            None,
            TripState::Pending,
            AuditActor::client(),
            String::from("Trip requested"),
            String::from("{}"),
        );

        assert!(entry.is_creation());

        let entry: AuditEntry = AuditEntry::new(
            Some(TripState::Pending),
            TripState::Declined,
            AuditActor::staff(1),
            String::from("Cancelled by staff"),
            String::from("{}"),
        );

        assert!(!entry.is_creation());
    }

    #[test]
    fn test_connected_timeline_is_accepted() {
        let transitions: Vec<(Option<TripState>, TripState)> = vec![
            (None, TripState::Pending),
            (Some(TripState::Pending), TripState::Confirmed),
            (Some(TripState::Confirmed), TripState::Accepted),
        ];

        assert!(timeline_is_connected(&transitions));
    }

    #[test]
    fn test_creation_only_timeline_is_connected() {
        let transitions: Vec<(Option<TripState>, TripState)> = vec![(None, TripState::Pending)];

        assert!(timeline_is_connected(&transitions));
    }

    #[test]
    fn test_empty_timeline_is_not_connected() {
        assert!(!timeline_is_connected(&[]));
    }

    #[test]
    fn test_timeline_with_gap_is_rejected() {
        // The middle entry claims the trip went straight from pending to
        // accepted, skipping the recorded confirmation.
        let transitions: Vec<(Option<TripState>, TripState)> = vec![
            (None, TripState::Pending),
            (Some(TripState::Pending), TripState::Confirmed),
            (Some(TripState::Pending), TripState::Accepted),
        ];

        assert!(!timeline_is_connected(&transitions));
    }

    #[test]
    fn test_timeline_starting_mid_stream_is_rejected() {
        let transitions: Vec<(Option<TripState>, TripState)> = vec![
            (Some(TripState::Pending), TripState::Confirmed),
            (Some(TripState::Confirmed), TripState::Accepted),
        ];

        assert!(!timeline_is_connected(&transitions));
    }
}
