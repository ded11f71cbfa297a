// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::price::Price;
use crate::trip_state::TripState;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Contact details for the client who requested a trip.
///
/// The email address is where the acceptance and decline links are sent,
/// so all three fields are required at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    /// The client's full name.
    pub name: String,
    /// Email address the response links are delivered to.
    pub email: String,
    /// Phone number dispatch can reach the client on.
    pub phone: String,
}

impl ClientContact {
    /// Creates new `ClientContact` details.
    ///
    /// # Arguments
    ///
    /// * `name` - The client's full name
    /// * `email` - The client's email address
    /// * `phone` - The client's phone number
    #[must_use]
    pub const fn new(name: String, email: String, phone: String) -> Self {
        Self { name, email, phone }
    }
}

/// A scheduled trip and everything persisted about it.
///
/// `trip_id` is the canonical identifier assigned by the database.
/// The two response tokens are generated once at creation and never
/// regenerated; they are how the unauthenticated client proves the
/// request is theirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTrip {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the trip has not been persisted yet.
    pub trip_id: Option<i64>,
    /// Contact details for the requesting client.
    pub client: ClientContact,
    /// Where the client is picked up.
    pub pickup_location: String,
    /// Where the client is dropped off.
    pub dropoff_location: String,
    /// When the pickup happens. Always UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub pickup_datetime: OffsetDateTime,
    /// Optional recurrence payload, stored as opaque JSON.
    pub recurrence_config: Option<String>,
    /// Price quoted by staff. Set when the trip is confirmed.
    pub price: Option<Price>,
    /// Current lifecycle state.
    pub state: TripState,
    /// Token the client redeems to accept. Unique across all trips.
    pub acceptance_token: String,
    /// Token the client redeems to decline. Unique across all trips.
    pub decline_token: String,
    /// Staff member who confirmed the trip, once reviewed.
    pub reviewed_by_id: Option<i64>,
    /// When the trip was confirmed, once reviewed.
    #[serde(with = "time::serde::rfc3339::option")]
    pub reviewed_at: Option<OffsetDateTime>,
    /// Free-form staff notes recorded at confirmation.
    pub notes: Option<String>,
    /// Assigned driver, if dispatch has picked one.
    pub driver_id: Option<i64>,
    /// When the trip was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the trip was last written.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ScheduledTrip {
    /// Creates a new trip in the `Pending` state, not yet persisted.
    ///
    /// The caller supplies freshly generated response tokens and the
    /// creation timestamp; `created_at` and `updated_at` start equal.
    ///
    /// # Arguments
    ///
    /// * `client` - The requesting client's contact details
    /// * `pickup_location` - Where the client is picked up
    /// * `dropoff_location` - Where the client is dropped off
    /// * `pickup_datetime` - When the pickup happens
    /// * `recurrence_config` - Optional recurrence payload (opaque JSON)
    /// * `acceptance_token` - Freshly generated acceptance token
    /// * `decline_token` - Freshly generated decline token
    /// * `created_at` - The creation timestamp
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        client: ClientContact,
        pickup_location: String,
        dropoff_location: String,
        pickup_datetime: OffsetDateTime,
        recurrence_config: Option<String>,
        acceptance_token: String,
        decline_token: String,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            trip_id: None,
            client,
            pickup_location,
            dropoff_location,
            pickup_datetime,
            recurrence_config,
            price: None,
            state: TripState::Pending,
            acceptance_token,
            decline_token,
            reviewed_by_id: None,
            reviewed_at: None,
            notes: None,
            driver_id: None,
            created_at,
            updated_at: created_at,
        }
    }
}
