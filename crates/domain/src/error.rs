// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Client name is empty or invalid.
    InvalidClientName(String),
    /// Client email is empty or invalid.
    InvalidClientEmail(String),
    /// Client phone number is empty or invalid.
    InvalidClientPhone(String),
    /// Pickup location is empty or invalid.
    InvalidPickupLocation(String),
    /// Dropoff location is empty or invalid.
    InvalidDropoffLocation(String),
    /// Pickup datetime is missing, unparseable, or not in the future.
    InvalidPickupDatetime(String),
    /// Price is missing, unparseable, or out of range.
    InvalidPrice(String),
    /// Trip state string does not name a known state.
    InvalidTripState {
        /// The unrecognized state value.
        state: String,
    },
    /// Requested transition is not permitted by the trip lifecycle.
    InvalidTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
        /// Why the transition is not permitted.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClientName(msg) => write!(f, "Invalid client name: {msg}"),
            Self::InvalidClientEmail(msg) => write!(f, "Invalid client email: {msg}"),
            Self::InvalidClientPhone(msg) => write!(f, "Invalid client phone: {msg}"),
            Self::InvalidPickupLocation(msg) => write!(f, "Invalid pickup location: {msg}"),
            Self::InvalidDropoffLocation(msg) => write!(f, "Invalid dropoff location: {msg}"),
            Self::InvalidPickupDatetime(msg) => write!(f, "Invalid pickup datetime: {msg}"),
            Self::InvalidPrice(msg) => write!(f, "Invalid price: {msg}"),
            Self::InvalidTripState { state } => {
                write!(f, "Invalid trip state: '{state}'")
            }
            Self::InvalidTransition { from, to, reason } => {
                write!(f, "Invalid transition from '{from}' to '{to}': {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
