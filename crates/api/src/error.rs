// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tripdesk::CoreError;
use tripdesk_domain::DomainError;
use tripdesk_persistence::PersistenceError;

use crate::token::TokenError;

/// The fixed message returned to unauthenticated callers for any token
/// failure.
///
/// Unknown tokens, tokens on trips no longer eligible for the requested
/// transition, and lost races all produce this exact message, so a caller
/// probing tokens learns nothing about which trips exist or what state
/// they are in.
pub const INVALID_TOKEN_MESSAGE: &str = "This response link is invalid or no longer active";

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The supplied staff identity could not be understood.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The staff actor lacks the capability for this action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and represent
/// the API contract. Staff-facing variants carry specific detail; the
/// client token surface collapses everything it may not reveal into
/// [`ApiError::InvalidToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A response token did not resolve to a trip eligible for the
    /// requested transition.
    ///
    /// Deliberately carries no detail. See [`INVALID_TOKEN_MESSAGE`].
    InvalidToken,
    /// The trip's current state does not permit the requested transition.
    InvalidState {
        /// A human-readable description of the violated guard.
        message: String,
    },
    /// The staff actor lacks the capability for this action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The storage layer reported write contention.
    ///
    /// Retryable on the same read, unlike [`ApiError::InvalidState`].
    StorageContention {
        /// A description of the contention.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InvalidToken => {
                write!(f, "{INVALID_TOKEN_MESSAGE}")
            }
            Self::InvalidState { message } => {
                write!(f, "Invalid state: {message}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StorageContention { message } => {
                write!(f, "Storage contention: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::InvalidInput {
                field: String::from("staff_identity"),
                message: reason,
            },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly. Field validation failures keep their field name so the
/// creating caller gets field-level detail.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidClientName(msg) => ApiError::InvalidInput {
            field: String::from("client_name"),
            message: msg,
        },
        DomainError::InvalidClientEmail(msg) => ApiError::InvalidInput {
            field: String::from("client_email"),
            message: msg,
        },
        DomainError::InvalidClientPhone(msg) => ApiError::InvalidInput {
            field: String::from("client_phone"),
            message: msg,
        },
        DomainError::InvalidPickupLocation(msg) => ApiError::InvalidInput {
            field: String::from("pickup_location"),
            message: msg,
        },
        DomainError::InvalidDropoffLocation(msg) => ApiError::InvalidInput {
            field: String::from("dropoff_location"),
            message: msg,
        },
        DomainError::InvalidPickupDatetime(msg) => ApiError::InvalidInput {
            field: String::from("pickup_datetime"),
            message: msg,
        },
        DomainError::InvalidPrice(msg) => ApiError::InvalidInput {
            field: String::from("price"),
            message: msg,
        },
        // A stored state that fails to parse is corrupt data, not bad
        // caller input.
        DomainError::InvalidTripState { state } => ApiError::Internal {
            message: format!("Stored trip state '{state}' is not recognized"),
        },
        DomainError::InvalidTransition { from, to, reason } => ApiError::InvalidState {
            message: format!("Cannot move trip from '{from}' to '{to}': {reason}"),
        },
    }
}

/// Translates a core lifecycle error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AcceptanceWindowClosed { pickup_datetime } => ApiError::InvalidState {
            message: format!(
                "Trip can no longer be accepted: pickup at {pickup_datetime} is less than 2 hours away"
            ),
        },
        CoreError::AutoDeclineNotDue { pickup_datetime } => ApiError::InvalidState {
            message: format!(
                "Trip is not due for auto-decline: pickup at {pickup_datetime} is more than 2 hours away"
            ),
        },
        CoreError::TimestampFormat { message } => ApiError::Internal { message },
    }
}

/// Translates a persistence error into an API error for staff surfaces.
///
/// Client token surfaces must NOT use this: they map state conflicts and
/// missing rows to the generic [`ApiError::InvalidToken`] instead, so
/// nothing about trip existence or state leaks to unauthenticated
/// callers.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TripNotFound(trip_id) => ApiError::NotFound {
            resource_type: String::from("Trip"),
            message: format!("No trip exists with id {trip_id}"),
        },
        PersistenceError::TokenNotFound => ApiError::InvalidToken,
        PersistenceError::StateConflict {
            trip_id,
            expected,
            actual,
        } => ApiError::InvalidState {
            message: format!(
                "Trip {trip_id} changed state while the request was processed: expected '{expected}', found '{actual}'"
            ),
        },
        PersistenceError::Busy(msg) => ApiError::StorageContention { message: msg },
        _ => ApiError::Internal {
            message: format!("Storage error: {err}"),
        },
    }
}
