// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff identity extraction for the server.
//!
//! Session issuance lives in the fronting auth layer, which sets the
//! `x-staff-id` and `x-staff-role` headers on every staff request it
//! forwards. This module provides the Axum extractor that turns those
//! headers into a typed [`StaffActor`] and rejects anything missing or
//! malformed before a handler runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use tripdesk_api::{Role, StaffActor};

/// Extractor for identified staff members.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     StaffIdentity(actor): StaffIdentity,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: StaffActor
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Identity Flow
///
/// 1. Extract the `x-staff-id` header and parse it as an integer
/// 2. Extract the `x-staff-role` header and parse it via [`Role::parse`]
/// 3. Return the [`StaffActor`] carrying both
///
/// Role capabilities are enforced later, in the api layer. This
/// extractor only establishes who is asking.
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - Either header is missing
/// - `x-staff-id` is not an integer
/// - `x-staff-role` names no known role
pub struct StaffIdentity(pub StaffActor);

impl<S> FromRequestParts<S> for StaffIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id_header = parts
            .headers
            .get("x-staff-id")
            .ok_or_else(|| {
                debug!("Missing x-staff-id header");
                IdentityError::MissingIdentity
            })?
            .to_str()
            .map_err(|_| {
                warn!("x-staff-id header is not valid UTF-8");
                IdentityError::MalformedIdentity(String::from("x-staff-id is not valid UTF-8"))
            })?;

        let staff_id: i64 = id_header.parse().map_err(|_| {
            warn!(header = %id_header, "x-staff-id header is not an integer");
            IdentityError::MalformedIdentity(format!("x-staff-id '{id_header}' is not an integer"))
        })?;

        let role_header = parts
            .headers
            .get("x-staff-role")
            .ok_or_else(|| {
                debug!("Missing x-staff-role header");
                IdentityError::MissingIdentity
            })?
            .to_str()
            .map_err(|_| {
                warn!("x-staff-role header is not valid UTF-8");
                IdentityError::MalformedIdentity(String::from("x-staff-role is not valid UTF-8"))
            })?;

        let role: Role = Role::parse(role_header).map_err(|e| {
            warn!(error = %e, "Staff role rejected");
            IdentityError::MalformedIdentity(e.to_string())
        })?;

        debug!(staff_id, role = role.as_str(), "Staff identity accepted");

        Ok(Self(StaffActor::new(staff_id, role)))
    }
}

/// Identity extraction errors.
///
/// These errors are returned when identity extraction fails and are
/// automatically converted to HTTP responses.
#[derive(Debug)]
pub enum IdentityError {
    /// One or both identity headers are missing.
    MissingIdentity,
    /// An identity header was present but could not be understood.
    MalformedIdentity(String),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                "Missing staff identity. Expected 'x-staff-id' and 'x-staff-role' headers",
            )
                .into_response(),
            Self::MalformedIdentity(reason) => (
                StatusCode::UNAUTHORIZED,
                format!("Staff identity rejected: {reason}"),
            )
                .into_response(),
        }
    }
}
