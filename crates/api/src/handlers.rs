// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! State-changing handlers follow one ordered recipe: authorize,
//! validate input, load the trip, evaluate the pure transition, persist
//! atomically, then hand the caller the response plus the notification
//! to dispatch after commit. No step is skipped and no step is hidden in
//! a hook.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};
use tripdesk::{
    CoreError, NotificationKind, TransitionRequest, TransitionResult, TripEvent, apply,
    creation_entry,
};
use tripdesk_domain::{
    ClientContact, Price, ScheduledTrip, TripState, validate_pickup_in_future,
    validate_trip_fields,
};
use tripdesk_persistence::{PersistenceError, SqlitePersistence, TripAuditRecord};

use crate::auth::{AuthorizationService, StaffActor};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AcceptTripResponse, AuditEntryInfo, CancelTripRequest, CancelTripResponse,
    ConfirmTripRequest, ConfirmTripResponse, CreateTripRequest, CreateTripResponse,
    DeclineTripResponse, GetTripAuditRequest, GetTripAuditResponse, GetTripRequest,
    GetTripResponse, ListTripsRequest, ListTripsResponse, SweepReport, TripInfo,
};
use crate::token::{MAX_TOKEN_INSERT_ATTEMPTS, TokenError, generate_token_pair};

/// The result of a state-changing API operation.
///
/// Couples the response with the notification kind the caller must
/// dispatch once the transaction has committed. Exactly one notification
/// fires per successful state change; dispatch stays outside the
/// transactional boundary so a slow or failed delivery can never hold a
/// trip's state hostage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The notification to dispatch post-commit.
    pub notification: NotificationKind,
}

/// Creates a new scheduled trip in the `pending` state.
///
/// This function:
/// - Validates the caller-supplied contact and location fields
/// - Requires the pickup datetime to be valid RFC 3339 and in the future
/// - Generates the acceptance/decline token pair
/// - Persists the trip together with its creation audit entry
/// - Retries with fresh tokens if the storage layer reports a collision
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The API request to create a trip
///
/// # Returns
///
/// * `Ok(ApiResult<CreateTripResponse>)` - The trip snapshot, both
///   response tokens, and the `TripCreated` notification
/// * `Err(ApiError)` - If validation fails or the trip cannot be stored
///
/// # Errors
///
/// Returns an error if:
/// - Any client contact field or location is invalid
/// - The pickup datetime is malformed or not in the future
/// - Token collisions persist past the retry bound
/// - The storage write fails
pub fn create_trip(
    persistence: &mut SqlitePersistence,
    request: &CreateTripRequest,
) -> Result<ApiResult<CreateTripResponse>, ApiError> {
    // Validate caller-supplied fields before touching storage
    let client: ClientContact = ClientContact::new(
        request.client_name.clone(),
        request.client_email.clone(),
        request.client_phone.clone(),
    );
    validate_trip_fields(&client, &request.pickup_location, &request.dropoff_location)
        .map_err(translate_domain_error)?;

    let pickup_datetime: OffsetDateTime =
        OffsetDateTime::parse(&request.pickup_datetime, &Rfc3339).map_err(|e| {
            ApiError::InvalidInput {
                field: String::from("pickup_datetime"),
                message: format!(
                    "'{}' is not a valid RFC 3339 timestamp: {e}",
                    request.pickup_datetime
                ),
            }
        })?;

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    validate_pickup_in_future(pickup_datetime, now).map_err(translate_domain_error)?;

    for _ in 0..MAX_TOKEN_INSERT_ATTEMPTS {
        let (acceptance_token, decline_token) = generate_token_pair();
        let trip: ScheduledTrip = ScheduledTrip::new(
            client.clone(),
            request.pickup_location.clone(),
            request.dropoff_location.clone(),
            pickup_datetime,
            request.recurrence_config.clone(),
            acceptance_token.clone(),
            decline_token.clone(),
            now,
        );

        match persistence.create_trip(&trip, &creation_entry()) {
            Ok(trip_id) => {
                let mut stored: ScheduledTrip = trip;
                stored.trip_id = Some(trip_id);

                let response: CreateTripResponse = CreateTripResponse {
                    trip: trip_to_info(&stored)?,
                    acceptance_token,
                    decline_token,
                    message: format!("Successfully created trip {trip_id}"),
                };

                return Ok(ApiResult {
                    response,
                    notification: NotificationKind::TripCreated,
                });
            }
            Err(PersistenceError::DuplicateToken(msg)) => {
                warn!(detail = %msg, "Response token collision on insert; regenerating");
            }
            Err(e) => return Err(translate_persistence_error(e)),
        }
    }

    Err(ApiError::from(TokenError::CollisionRetriesExhausted {
        attempts: MAX_TOKEN_INSERT_ATTEMPTS,
    }))
}

/// Confirms a pending trip with a quoted price.
///
/// This function:
/// - Verifies the actor carries the review capability (Manager role)
/// - Parses the quoted price
/// - Evaluates the `confirm` transition against the stored trip
/// - Persists the state change and audit entry atomically
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The API request to confirm a trip
/// * `actor` - The staff actor performing this action
///
/// # Returns
///
/// * `Ok(ApiResult<ConfirmTripResponse>)` - The updated snapshot and the
///   `TripConfirmed` notification
/// * `Err(ApiError)` - If unauthorized, the input is invalid, or the
///   transition is not permitted
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a Manager
/// - The price string does not parse
/// - The trip does not exist or is not in `pending`
/// - Another actor moved the trip first (state conflict)
pub fn confirm_trip(
    persistence: &mut SqlitePersistence,
    request: &ConfirmTripRequest,
    actor: &StaffActor,
) -> Result<ApiResult<ConfirmTripResponse>, ApiError> {
    // Enforce authorization before touching the trip
    AuthorizationService::authorize_confirm_trip(actor)?;

    let price: Price = Price::parse(&request.price).map_err(translate_domain_error)?;

    let trip: ScheduledTrip = persistence
        .get_trip(request.trip_id)
        .map_err(translate_persistence_error)?;

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let transition: TransitionResult = apply(
        &trip,
        TripEvent::Confirm {
            price,
            notes: request.notes.clone(),
        },
        TransitionRequest::staff(actor.staff_id, None),
        now,
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_transition(request.trip_id, trip.state, &transition)
        .map_err(translate_persistence_error)?;

    let response: ConfirmTripResponse = ConfirmTripResponse {
        trip: trip_to_info(&transition.updated_trip)?,
        message: format!("Successfully confirmed trip {} at {price}", request.trip_id),
    };

    Ok(ApiResult {
        response,
        notification: transition.notification,
    })
}

/// Cancels a trip on behalf of staff.
///
/// Pending and confirmed trips may be cancelled; the optional reason is
/// recorded in the audit trail in place of the default.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The API request to cancel a trip
/// * `actor` - The staff actor performing this action
///
/// # Returns
///
/// * `Ok(ApiResult<CancelTripResponse>)` - The updated snapshot and the
///   `TripDeclined` notification
/// * `Err(ApiError)` - If the trip is missing or already terminal
///
/// # Errors
///
/// Returns an error if:
/// - The trip does not exist or is already in a terminal state
/// - Another actor moved the trip first (state conflict)
pub fn cancel_trip(
    persistence: &mut SqlitePersistence,
    request: &CancelTripRequest,
    actor: &StaffActor,
) -> Result<ApiResult<CancelTripResponse>, ApiError> {
    AuthorizationService::authorize_cancel_trip(actor)?;

    let trip: ScheduledTrip = persistence
        .get_trip(request.trip_id)
        .map_err(translate_persistence_error)?;

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let transition: TransitionResult = apply(
        &trip,
        TripEvent::Decline,
        TransitionRequest::staff(actor.staff_id, request.reason.clone()),
        now,
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_transition(request.trip_id, trip.state, &transition)
        .map_err(translate_persistence_error)?;

    let response: CancelTripResponse = CancelTripResponse {
        trip: trip_to_info(&transition.updated_trip)?,
        message: format!("Successfully cancelled trip {}", request.trip_id),
    };

    Ok(ApiResult {
        response,
        notification: transition.notification,
    })
}

/// Accepts a confirmed trip through its acceptance token.
///
/// This is the unauthenticated client surface. Every failure the caller
/// may not learn about collapses into the one generic
/// [`ApiError::InvalidToken`]: an unknown token, a trip that is not
/// eligible, and a lost race all read identically. The only specific
/// failure is the response-window guard on a correctly resolved
/// confirmed trip, where telling the client they are too close to pickup
/// reveals nothing they do not already know.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `token` - The bare acceptance token from the response link
///
/// # Returns
///
/// * `Ok(ApiResult<AcceptTripResponse>)` - The updated snapshot and the
///   `TripAccepted` notification
/// * `Err(ApiError)` - On any failure, almost always `InvalidToken`
///
/// # Errors
///
/// Returns an error if:
/// - The token resolves to nothing or to an ineligible trip
/// - The pickup is 2 hours away or closer (`InvalidState`)
/// - Another actor moved the trip first (reported as `InvalidToken`)
pub fn accept_trip_by_token(
    persistence: &mut SqlitePersistence,
    token: &str,
) -> Result<ApiResult<AcceptTripResponse>, ApiError> {
    let trip: ScheduledTrip = persistence
        .get_trip_by_acceptance_token(token)
        .map_err(client_surface_read_error)?;

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let transition: TransitionResult =
        match apply(&trip, TripEvent::Accept, TransitionRequest::client(), now) {
            Ok(result) => result,
            // The token resolved but the trip is not eligible; reveal
            // nothing beyond the generic token failure.
            Err(CoreError::DomainViolation(_)) => return Err(ApiError::InvalidToken),
            Err(e) => return Err(translate_core_error(e)),
        };

    persist_client_transition(persistence, &trip, &transition)?;

    let response: AcceptTripResponse = AcceptTripResponse {
        trip: trip_to_info(&transition.updated_trip)?,
        message: String::from("Trip accepted"),
    };

    Ok(ApiResult {
        response,
        notification: transition.notification,
    })
}

/// Declines a trip through its decline token.
///
/// This is the unauthenticated client surface; the same privacy rules as
/// [`accept_trip_by_token`] apply. Declining has no window guard, so a
/// pending or confirmed trip may be declined right up to pickup.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `token` - The bare decline token from the response link
///
/// # Returns
///
/// * `Ok(ApiResult<DeclineTripResponse>)` - The updated snapshot and the
///   `TripDeclined` notification
/// * `Err(ApiError)` - On any failure, almost always `InvalidToken`
///
/// # Errors
///
/// Returns an error if the token resolves to nothing, to a trip already
/// in a terminal state, or the write loses a race.
pub fn decline_trip_by_token(
    persistence: &mut SqlitePersistence,
    token: &str,
) -> Result<ApiResult<DeclineTripResponse>, ApiError> {
    let trip: ScheduledTrip = persistence
        .get_trip_by_decline_token(token)
        .map_err(client_surface_read_error)?;

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let transition: TransitionResult =
        match apply(&trip, TripEvent::Decline, TransitionRequest::client(), now) {
            Ok(result) => result,
            Err(CoreError::DomainViolation(_)) => return Err(ApiError::InvalidToken),
            Err(e) => return Err(translate_core_error(e)),
        };

    persist_client_transition(persistence, &trip, &transition)?;

    let response: DeclineTripResponse = DeclineTripResponse {
        trip: trip_to_info(&transition.updated_trip)?,
        message: String::from("Trip declined"),
    };

    Ok(ApiResult {
        response,
        notification: transition.notification,
    })
}

/// Runs one auto-decline sweep pass on behalf of staff.
///
/// Same pass the periodic task runs; the manual trigger additionally
/// requires the Manager role.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The staff actor triggering the pass
///
/// # Errors
///
/// Returns an error if the actor is not a Manager or the candidate query
/// fails. Per-trip failures never fail the pass; they are counted and
/// logged instead.
pub fn run_auto_decline_sweep(
    persistence: &mut SqlitePersistence,
    actor: &StaffActor,
) -> Result<SweepReport, ApiError> {
    AuthorizationService::authorize_run_sweep(actor)?;
    sweep_once(persistence)
}

/// Runs one auto-decline sweep pass.
///
/// Finds confirmed trips whose pickup is at or inside the response
/// cutoff and drives each through the `auto_decline` transition, one
/// short transaction per trip. A trip whose state moves under the pass
/// is an expected race: it is skipped and logged, never retried against
/// stale data, and never aborts the rest of the batch. A second pass
/// over the same data finds no candidates and declines nothing.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
///
/// # Errors
///
/// Returns an error only if the candidate query itself fails.
pub fn sweep_once(persistence: &mut SqlitePersistence) -> Result<SweepReport, ApiError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let candidates: Vec<ScheduledTrip> = persistence
        .list_sweep_candidates(now)
        .map_err(translate_persistence_error)?;

    let examined: usize = candidates.len();
    let mut declined: usize = 0;
    let mut skipped: usize = 0;
    let mut failed: usize = 0;
    let mut declined_trips: Vec<TripInfo> = Vec::new();

    for trip in candidates {
        let Some(trip_id) = trip.trip_id else {
            failed += 1;
            error!("Sweep candidate is missing its identifier");
            continue;
        };

        let transition: TransitionResult =
            match apply(&trip, TripEvent::AutoDecline, TransitionRequest::sweep(), now) {
                Ok(result) => result,
                Err(CoreError::AutoDeclineNotDue { .. }) => {
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    failed += 1;
                    error!(trip_id, error = %e, "Sweep could not evaluate trip");
                    continue;
                }
            };

        // Contention is retryable on the same read; a state conflict is
        // not, because the trip genuinely moved.
        let mut outcome = persistence.persist_transition(trip_id, trip.state, &transition);
        if matches!(outcome, Err(PersistenceError::Busy(_))) {
            outcome = persistence.persist_transition(trip_id, trip.state, &transition);
        }

        match outcome {
            Ok(()) => {
                declined += 1;
                match trip_to_info(&transition.updated_trip) {
                    Ok(info) => declined_trips.push(info),
                    Err(e) => {
                        error!(trip_id, error = %e, "Sweep could not snapshot declined trip");
                    }
                }
            }
            Err(PersistenceError::StateConflict { .. }) => {
                skipped += 1;
                info!(trip_id, "Trip moved before the sweep could decline it; skipping");
            }
            Err(e) => {
                failed += 1;
                error!(trip_id, error = %e, "Sweep could not persist auto-decline");
            }
        }
    }

    info!(
        examined,
        declined, skipped, failed, "Auto-decline sweep pass finished"
    );

    let message: String = format!(
        "Sweep examined {examined} trips: {declined} auto-declined, {skipped} skipped, {failed} failed"
    );

    Ok(SweepReport {
        examined,
        declined,
        skipped,
        failed,
        declined_trips,
        message,
    })
}

/// Fetches one trip by its identifier.
///
/// # Errors
///
/// Returns an error if the trip does not exist or the query fails.
pub fn get_trip(
    persistence: &mut SqlitePersistence,
    request: &GetTripRequest,
    actor: &StaffActor,
) -> Result<GetTripResponse, ApiError> {
    AuthorizationService::authorize_view_trips(actor)?;

    let trip: ScheduledTrip = persistence
        .get_trip(request.trip_id)
        .map_err(translate_persistence_error)?;

    Ok(GetTripResponse {
        trip: trip_to_info(&trip)?,
    })
}

/// Lists trips, optionally filtered to one lifecycle state.
///
/// # Errors
///
/// Returns an error if the state filter names no known state or the
/// query fails.
pub fn list_trips(
    persistence: &mut SqlitePersistence,
    request: &ListTripsRequest,
    actor: &StaffActor,
) -> Result<ListTripsResponse, ApiError> {
    AuthorizationService::authorize_view_trips(actor)?;

    let filter: Option<TripState> = match request.state.as_deref() {
        Some(value) => {
            let state: TripState = value.parse().map_err(|_| ApiError::InvalidInput {
                field: String::from("state"),
                message: format!("'{value}' is not a trip state"),
            })?;
            Some(state)
        }
        None => None,
    };

    let trips: Vec<ScheduledTrip> = persistence
        .list_trips(filter)
        .map_err(translate_persistence_error)?;

    let infos: Vec<TripInfo> = trips.iter().map(trip_to_info).collect::<Result<_, _>>()?;

    Ok(ListTripsResponse { trips: infos })
}

/// Fetches a trip's audit timeline, oldest entry first.
///
/// # Errors
///
/// Returns an error if the trip does not exist or the timeline cannot be
/// read.
pub fn get_trip_audit_timeline(
    persistence: &mut SqlitePersistence,
    request: &GetTripAuditRequest,
    actor: &StaffActor,
) -> Result<GetTripAuditResponse, ApiError> {
    AuthorizationService::authorize_view_trips(actor)?;

    // Load the trip first so a missing id is reported as not-found, not
    // as an empty timeline.
    persistence
        .get_trip(request.trip_id)
        .map_err(translate_persistence_error)?;

    let records: Vec<TripAuditRecord> = persistence
        .get_audit_timeline(request.trip_id)
        .map_err(translate_persistence_error)?;

    let entries: Vec<AuditEntryInfo> = records
        .iter()
        .map(audit_record_to_info)
        .collect::<Result<_, _>>()?;

    Ok(GetTripAuditResponse {
        trip_id: request.trip_id,
        entries,
    })
}

/// Maps a storage read failure on the token surface.
///
/// Unknown tokens become the generic token failure. Contention and
/// internal errors keep their meaning, since they reveal nothing about
/// any particular trip.
fn client_surface_read_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TokenNotFound => ApiError::InvalidToken,
        PersistenceError::Busy(msg) => ApiError::StorageContention { message: msg },
        _ => ApiError::Internal {
            message: format!("Storage error: {err}"),
        },
    }
}

/// Persists a client-driven transition under token-surface privacy
/// rules: a lost race or a vanished row is indistinguishable from an
/// ineligible trip.
fn persist_client_transition(
    persistence: &mut SqlitePersistence,
    trip: &ScheduledTrip,
    transition: &TransitionResult,
) -> Result<(), ApiError> {
    let Some(trip_id) = trip.trip_id else {
        return Err(ApiError::Internal {
            message: String::from("Stored trip is missing its identifier"),
        });
    };

    match persistence.persist_transition(trip_id, trip.state, transition) {
        Ok(()) => Ok(()),
        Err(PersistenceError::StateConflict { .. } | PersistenceError::TripNotFound(_)) => {
            Err(ApiError::InvalidToken)
        }
        Err(PersistenceError::Busy(msg)) => Err(ApiError::StorageContention { message: msg }),
        Err(e) => Err(translate_persistence_error(e)),
    }
}

/// Converts a domain trip into its API snapshot form.
///
/// # Errors
///
/// Returns an error if the trip has no identifier or a timestamp cannot
/// be formatted.
fn trip_to_info(trip: &ScheduledTrip) -> Result<TripInfo, ApiError> {
    let Some(trip_id) = trip.trip_id else {
        return Err(ApiError::Internal {
            message: String::from("Trip snapshot is missing its identifier"),
        });
    };

    Ok(TripInfo {
        trip_id,
        client_name: trip.client.name.clone(),
        client_email: trip.client.email.clone(),
        client_phone: trip.client.phone.clone(),
        pickup_location: trip.pickup_location.clone(),
        dropoff_location: trip.dropoff_location.clone(),
        pickup_datetime: format_timestamp(trip.pickup_datetime)?,
        recurrence_config: trip.recurrence_config.clone(),
        price: trip.price.map(|p| p.to_string()),
        state: trip.state.as_str().to_string(),
        reviewed_by_id: trip.reviewed_by_id,
        reviewed_at: trip.reviewed_at.map(format_timestamp).transpose()?,
        notes: trip.notes.clone(),
        driver_id: trip.driver_id,
        created_at: format_timestamp(trip.created_at)?,
        updated_at: format_timestamp(trip.updated_at)?,
    })
}

/// Converts a stored audit record into its API form.
fn audit_record_to_info(record: &TripAuditRecord) -> Result<AuditEntryInfo, ApiError> {
    Ok(AuditEntryInfo {
        id: record.id,
        previous_state: record.previous_state.map(|s| s.as_str().to_string()),
        new_state: record.new_state.as_str().to_string(),
        changed_by_id: record.changed_by_id,
        change_reason: record.change_reason.clone(),
        metadata: record.metadata.clone(),
        created_at: format_timestamp(record.created_at)?,
    })
}

/// Formats a timestamp for an API response.
fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}
