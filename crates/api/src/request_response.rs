// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry caller-supplied strings and are parsed/validated by
//! the handlers; responses are fully serializable snapshots. Timestamps
//! cross this boundary as RFC 3339 strings, prices as decimal strings.

/// API request to create a new scheduled trip.
///
/// This DTO is distinct from domain types and represents the API
/// contract. The pickup datetime is an RFC 3339 string and must be in
/// the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTripRequest {
    /// The requesting client's full name.
    pub client_name: String,
    /// The client's email address (where the response links are sent).
    pub client_email: String,
    /// The client's phone number.
    pub client_phone: String,
    /// Where the client is picked up.
    pub pickup_location: String,
    /// Where the client is dropped off.
    pub dropoff_location: String,
    /// When the pickup happens (RFC 3339, must be future-dated).
    pub pickup_datetime: String,
    /// Optional recurrence payload, stored opaquely as JSON text.
    pub recurrence_config: Option<String>,
}

/// API response for a successful trip creation.
///
/// Carries the response tokens so the outbound email layer can build the
/// accept/decline links. Staff read responses never include tokens.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateTripResponse {
    /// The trip snapshot as persisted.
    pub trip: TripInfo,
    /// Token the client redeems to accept.
    pub acceptance_token: String,
    /// Token the client redeems to decline.
    pub decline_token: String,
    /// A success message.
    pub message: String,
}

/// API request to confirm a pending trip with a quoted price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmTripRequest {
    /// The trip to confirm.
    pub trip_id: i64,
    /// The price quoted to the client, as a decimal string ("45.00").
    pub price: String,
    /// Optional review notes, recorded on the trip.
    pub notes: Option<String>,
}

/// API response for a successful trip confirmation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConfirmTripResponse {
    /// The trip snapshot after the transition.
    pub trip: TripInfo,
    /// A success message.
    pub message: String,
}

/// API request to cancel a trip on behalf of staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTripRequest {
    /// The trip to cancel.
    pub trip_id: i64,
    /// Optional reason, recorded in the audit trail.
    pub reason: Option<String>,
}

/// API response for a successful staff cancellation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelTripResponse {
    /// The trip snapshot after the transition.
    pub trip: TripInfo,
    /// A success message.
    pub message: String,
}

/// API response when a client accepts through their token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AcceptTripResponse {
    /// The trip snapshot after the transition.
    pub trip: TripInfo,
    /// A success message.
    pub message: String,
}

/// API response when a client declines through their token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclineTripResponse {
    /// The trip snapshot after the transition.
    pub trip: TripInfo,
    /// A success message.
    pub message: String,
}

/// API request to list trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTripsRequest {
    /// Restrict results to one lifecycle state, by its string form.
    pub state: Option<String>,
}

/// API response for listing trips.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListTripsResponse {
    /// Trips ordered by pickup time, soonest first.
    pub trips: Vec<TripInfo>,
}

/// API request to fetch one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTripRequest {
    /// The trip to fetch.
    pub trip_id: i64,
}

/// API response for fetching one trip.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetTripResponse {
    /// The trip snapshot.
    pub trip: TripInfo,
}

/// API request to fetch a trip's audit timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTripAuditRequest {
    /// The trip whose timeline to fetch.
    pub trip_id: i64,
}

/// API response for a trip's audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetTripAuditResponse {
    /// The trip the timeline belongs to.
    pub trip_id: i64,
    /// Audit entries, oldest first. The first entry records creation.
    pub entries: Vec<AuditEntryInfo>,
}

/// API response for one auto-decline sweep pass.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepReport {
    /// How many candidate trips the pass examined.
    pub examined: usize,
    /// How many trips were auto-declined.
    pub declined: usize,
    /// How many trips were skipped because their state moved under the
    /// pass (expected races).
    pub skipped: usize,
    /// How many trips failed with an unexpected error (logged).
    pub failed: usize,
    /// Snapshots of the auto-declined trips, for notification fan-out.
    pub declined_trips: Vec<TripInfo>,
    /// A summary message.
    pub message: String,
}

/// Scheduled trip information for API responses.
///
/// Response tokens are deliberately absent: they are capability secrets
/// delivered to the client by email, not staff-visible data. Creation is
/// the one surface that returns them, on [`CreateTripResponse`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TripInfo {
    /// The trip's canonical identifier.
    pub trip_id: i64,
    /// The requesting client's full name.
    pub client_name: String,
    /// The client's email address.
    pub client_email: String,
    /// The client's phone number.
    pub client_phone: String,
    /// Where the client is picked up.
    pub pickup_location: String,
    /// Where the client is dropped off.
    pub dropoff_location: String,
    /// When the pickup happens (RFC 3339).
    pub pickup_datetime: String,
    /// Optional recurrence payload (opaque JSON text).
    pub recurrence_config: Option<String>,
    /// The quoted price as a decimal string, once confirmed.
    pub price: Option<String>,
    /// The current lifecycle state.
    pub state: String,
    /// The staff member who confirmed the trip, once reviewed.
    pub reviewed_by_id: Option<i64>,
    /// When the trip was confirmed (RFC 3339), once reviewed.
    pub reviewed_at: Option<String>,
    /// Review notes recorded at confirmation.
    pub notes: Option<String>,
    /// The assigned driver, if dispatch has picked one.
    pub driver_id: Option<i64>,
    /// When the trip was created (RFC 3339).
    pub created_at: String,
    /// When the trip was last written (RFC 3339).
    pub updated_at: String,
}

/// One audit timeline entry for API responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEntryInfo {
    /// The entry's identifier, strictly increasing per timeline.
    pub id: i64,
    /// The state before the change. `None` only for the creation entry.
    pub previous_state: Option<String>,
    /// The state after the change.
    pub new_state: String,
    /// The acting staff member, when one drove the change.
    pub changed_by_id: Option<i64>,
    /// Why the change happened.
    pub change_reason: String,
    /// Structured context as a JSON document.
    pub metadata: String,
    /// When the entry was written (RFC 3339).
    pub created_at: String,
}
