// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use tripdesk_domain::{Price, TripState};

/// An event represents intent to move a trip through its lifecycle, as data only.
///
/// Events are the only way to request a transition. Whether an event is
/// permitted for the trip's current state, and whether its wall-clock guard
/// holds, is decided by [`apply`](crate::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripEvent {
    /// Staff confirm the trip, quoting a price with optional notes.
    Confirm {
        /// The price quoted to the client.
        price: Price,
        /// Free-form review notes, recorded on the trip.
        notes: Option<String>,
    },
    /// The client accepts through their acceptance token.
    Accept,
    /// Staff cancel the trip, or the client declines through their token.
    Decline,
    /// The sweep declines a confirmed trip nobody responded to in time.
    AutoDecline,
}

impl TripEvent {
    /// Returns the state this event drives a trip into.
    #[must_use]
    pub const fn target_state(&self) -> TripState {
        match self {
            Self::Confirm { .. } => TripState::Confirmed,
            Self::Accept => TripState::Accepted,
            Self::Decline => TripState::Declined,
            Self::AutoDecline => TripState::AutoDeclined,
        }
    }
}

/// The kind of outbound notification fired for a committed change.
///
/// Exactly one notification of the matching kind fires per successful
/// state change, after the transaction commits. Dispatch is best-effort
/// and can never affect the change itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A trip was created and is awaiting review.
    TripCreated,
    /// Staff confirmed a trip; the client is asked to respond.
    TripConfirmed,
    /// The client accepted a confirmed trip.
    TripAccepted,
    /// The trip was declined by staff or by the client.
    TripDeclined,
    /// The sweep declined a trip that got no response in time.
    TripAutoDeclined,
}

impl NotificationKind {
    /// Returns the string representation of this notification kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TripCreated => "trip_created",
            Self::TripConfirmed => "trip_confirmed",
            Self::TripAccepted => "trip_accepted",
            Self::TripDeclined => "trip_declined",
            Self::TripAutoDeclined => "trip_auto_declined",
        }
    }
}
