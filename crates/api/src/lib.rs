// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the TripDesk fleet operations backend.
//!
//! This crate sits between the transport layer and the pure lifecycle
//! core. It owns the operation-level contract: request/response DTOs,
//! the API error taxonomy, role-based authorization for staff actions,
//! response-token generation, and the handler functions that drive each
//! operation through validate-apply-persist.
//!
//! Handlers know nothing about HTTP. The server crate maps errors to
//! status codes and dispatches the notification each successful state
//! change hands back.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;
mod token;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationService, Role, StaffActor};
pub use error::{
    ApiError, AuthError, INVALID_TOKEN_MESSAGE, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    ApiResult, accept_trip_by_token, cancel_trip, confirm_trip, create_trip,
    decline_trip_by_token, get_trip, get_trip_audit_timeline, list_trips,
    run_auto_decline_sweep, sweep_once,
};
pub use request_response::{
    AcceptTripResponse, AuditEntryInfo, CancelTripRequest, CancelTripResponse,
    ConfirmTripRequest, ConfirmTripResponse, CreateTripRequest, CreateTripResponse,
    DeclineTripResponse, GetTripAuditRequest, GetTripAuditResponse, GetTripRequest,
    GetTripResponse, ListTripsRequest, ListTripsResponse, SweepReport, TripInfo,
};
pub use token::{MAX_TOKEN_INSERT_ATTEMPTS, TokenError, generate_token, generate_token_pair};
