// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::event::{NotificationKind, TripEvent};
use crate::request::TransitionRequest;
use crate::result::TransitionResult;
use time::OffsetDateTime;
use tripdesk_audit::{ActorKind, AuditActor, AuditEntry};
use tripdesk_domain::{
    ScheduledTrip, TripState, auto_decline_due, within_acceptance_window,
};

/// Reason recorded for the audit entry written when a trip is created.
pub const CREATION_REASON: &str = "Trip requested by client";

/// Default reason when staff confirm without supplying one.
pub const CONFIRM_REASON: &str = "Confirmed by staff";

/// Default reason when the client accepts.
pub const ACCEPT_REASON: &str = "Accepted by client";

/// Default reason when staff cancel without supplying one.
pub const STAFF_CANCEL_REASON: &str = "Cancelled by staff";

/// Default reason when the client declines.
pub const CLIENT_DECLINE_REASON: &str = "Declined by client";

/// Reason recorded when the sweep declines an unanswered trip.
pub const AUTO_DECLINE_REASON: &str =
    "Auto-declined: No response received within 2 hours of pickup time";

/// Evaluates a lifecycle event against a trip, producing the updated trip
/// and its audit entry.
///
/// This function is pure: it reads the trip and the supplied clock, touches
/// no storage, and fires no notifications. Orchestration (load, persist
/// atomically, dispatch) wraps it.
///
/// The transition table is checked before any wall-clock guard, so callers
/// get the most specific error for terminal or out-of-order trips.
///
/// # Arguments
///
/// * `trip` - The trip as currently persisted
/// * `event` - The lifecycle event to evaluate
/// * `request` - Who is driving the transition and why
/// * `now` - The current time
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the updated trip, audit entry, and
///   notification kind
/// * `Err(CoreError)` if the transition or its guard is violated
///
/// # Errors
///
/// Returns an error if:
/// - The trip's current state does not permit the event
/// - An accept arrives with pickup inside the response cutoff
/// - An auto-decline arrives with pickup still outside the cutoff
pub fn apply(
    trip: &ScheduledTrip,
    event: TripEvent,
    request: TransitionRequest,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let target: TripState = event.target_state();

    // Validate the transition table first
    trip.state.validate_transition(target)?;

    let TransitionRequest { actor, reason } = request;

    match event {
        TripEvent::Confirm { price, notes } => {
            let mut updated_trip: ScheduledTrip = trip.clone();
            updated_trip.state = target;
            updated_trip.price = Some(price);
            updated_trip.notes = notes;
            updated_trip.reviewed_by_id = actor.changed_by_id();
            updated_trip.reviewed_at = Some(now);
            updated_trip.updated_at = now;

            let reason: String = reason.unwrap_or_else(|| String::from(CONFIRM_REASON));
            let metadata: String = serde_json::json!({
                "actor": actor.kind.as_str(),
                "price": price.to_string(),
            })
            .to_string();

            let audit_entry: AuditEntry =
                AuditEntry::new(Some(trip.state), target, actor, reason, metadata);

            Ok(TransitionResult {
                updated_trip,
                audit_entry,
                notification: NotificationKind::TripConfirmed,
            })
        }
        TripEvent::Accept => {
            // Guard: the pickup must still be far enough away to honor
            if !within_acceptance_window(trip.pickup_datetime, now) {
                return Err(CoreError::AcceptanceWindowClosed {
                    pickup_datetime: trip.pickup_datetime,
                });
            }

            let mut updated_trip: ScheduledTrip = trip.clone();
            updated_trip.state = target;
            updated_trip.updated_at = now;

            let reason: String = reason.unwrap_or_else(|| String::from(ACCEPT_REASON));
            let metadata: String = serde_json::json!({
                "actor": actor.kind.as_str(),
            })
            .to_string();

            let audit_entry: AuditEntry =
                AuditEntry::new(Some(trip.state), target, actor, reason, metadata);

            Ok(TransitionResult {
                updated_trip,
                audit_entry,
                notification: NotificationKind::TripAccepted,
            })
        }
        TripEvent::Decline => {
            let mut updated_trip: ScheduledTrip = trip.clone();
            updated_trip.state = target;
            updated_trip.updated_at = now;

            // Staff cancellations and client declines land in the same
            // state but record different default reasons.
            let fallback: &str = if actor.kind == ActorKind::Staff {
                STAFF_CANCEL_REASON
            } else {
                CLIENT_DECLINE_REASON
            };
            let reason: String = reason.unwrap_or_else(|| String::from(fallback));
            let metadata: String = serde_json::json!({
                "actor": actor.kind.as_str(),
            })
            .to_string();

            let audit_entry: AuditEntry =
                AuditEntry::new(Some(trip.state), target, actor, reason, metadata);

            Ok(TransitionResult {
                updated_trip,
                audit_entry,
                notification: NotificationKind::TripDeclined,
            })
        }
        TripEvent::AutoDecline => {
            // Guard: only trips whose pickup is at or inside the cutoff
            if !auto_decline_due(trip.pickup_datetime, now) {
                return Err(CoreError::AutoDeclineNotDue {
                    pickup_datetime: trip.pickup_datetime,
                });
            }

            let decided_at: String = now
                .format(&time::format_description::well_known::Rfc3339)
                .map_err(|e| CoreError::TimestampFormat {
                    message: format!("Failed to format decision time: {e}"),
                })?;

            let mut updated_trip: ScheduledTrip = trip.clone();
            updated_trip.state = target;
            updated_trip.updated_at = now;

            let reason: String = reason.unwrap_or_else(|| String::from(AUTO_DECLINE_REASON));
            let metadata: String = serde_json::json!({
                "actor": actor.kind.as_str(),
                "decided_at": decided_at,
            })
            .to_string();

            let audit_entry: AuditEntry =
                AuditEntry::new(Some(trip.state), target, actor, reason, metadata);

            Ok(TransitionResult {
                updated_trip,
                audit_entry,
                notification: NotificationKind::TripAutoDeclined,
            })
        }
    }
}

/// Builds the audit entry recorded when a trip is created.
///
/// Creation is not a transition, but every trip's audit walk starts with
/// this entry. It must be written in the same transaction as the insert,
/// with no previous state.
#[must_use]
pub fn creation_entry() -> AuditEntry {
    AuditEntry::new(
        None,
        TripState::Pending,
        AuditActor::client(),
        String::from(CREATION_REASON),
        serde_json::json!({
            "actor": ActorKind::Client.as_str(),
        })
        .to_string(),
    )
}
