// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled trip states and transition logic.
//!
//! This module defines the trip lifecycle states and which transitions are
//! permitted. It also owns the client-response cutoff rule: once a pickup is
//! two hours away or closer, a confirmed trip can no longer be accepted and
//! becomes eligible for auto-decline instead.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// How close to pickup a client response is still accepted.
///
/// A confirmed trip can be accepted strictly more than this long before
/// pickup. At or inside the cutoff, acceptance is refused and the sweep may
/// auto-decline the trip. The two predicates below are exact complements so
/// no trip is ever both acceptable and sweep-eligible.
pub const CLIENT_RESPONSE_CUTOFF: Duration = Duration::hours(2);

/// Lifecycle states of a scheduled trip.
///
/// A trip is created in `Pending`, moves to `Confirmed` when staff review it,
/// and ends in exactly one of the three terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripState {
    /// Created by the client, awaiting staff review.
    Pending,
    /// Reviewed and priced by staff, awaiting the client's response.
    Confirmed,
    /// Client accepted via their acceptance token.
    Accepted,
    /// Declined by staff or by the client via their decline token.
    Declined,
    /// Declined by the sweep because no response arrived before the cutoff.
    AutoDeclined,
}

impl TripState {
    /// Returns the string representation of the state.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::AutoDeclined => "auto_declined",
        }
    }

    /// Parses a state from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTripState` if the string is not a valid state.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "auto_declined" => Ok(Self::AutoDeclined),
            _ => Err(DomainError::InvalidTripState {
                state: s.to_string(),
            }),
        }
    }

    /// Returns true if this state is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined | Self::AutoDeclined)
    }

    /// Validates that a transition from this state to `new_state` is permitted.
    ///
    /// This checks the transition table only. Wall-clock guards (the pickup
    /// cutoff) are evaluated separately by the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_state: Self) -> Result<(), DomainError> {
        // Cannot transition out of terminal states
        if self.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "cannot transition from a terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(new_state, Self::Confirmed | Self::Declined),
            Self::Confirmed => matches!(
                new_state,
                Self::Accepted | Self::Declined | Self::AutoDeclined
            ),
            Self::Accepted | Self::Declined | Self::AutoDeclined => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "transition not permitted by the trip lifecycle".to_string(),
            })
        }
    }
}

impl FromStr for TripState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Returns true if a confirmed trip may still be accepted.
///
/// Acceptance requires the pickup to be strictly more than
/// [`CLIENT_RESPONSE_CUTOFF`] in the future.
#[must_use]
pub fn within_acceptance_window(pickup_datetime: OffsetDateTime, now: OffsetDateTime) -> bool {
    pickup_datetime - now > CLIENT_RESPONSE_CUTOFF
}

/// Returns true if a confirmed trip is due for auto-decline.
///
/// Exact complement of [`within_acceptance_window`]: the pickup is at or
/// inside the cutoff.
#[must_use]
pub fn auto_decline_due(pickup_datetime: OffsetDateTime, now: OffsetDateTime) -> bool {
    !within_acceptance_window(pickup_datetime, now)
}
