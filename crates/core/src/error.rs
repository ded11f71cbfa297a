// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use tripdesk_domain::DomainError;

/// Errors that can occur while evaluating a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A confirmed trip can no longer be accepted because its pickup is
    /// inside the client response cutoff.
    AcceptanceWindowClosed {
        /// The trip's pickup time.
        pickup_datetime: OffsetDateTime,
    },
    /// The sweep asked to auto-decline a trip whose pickup is still outside
    /// the client response cutoff.
    AutoDeclineNotDue {
        /// The trip's pickup time.
        pickup_datetime: OffsetDateTime,
    },
    /// A timestamp could not be rendered for the audit record.
    TimestampFormat {
        /// What failed.
        message: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::AcceptanceWindowClosed { pickup_datetime } => {
                write!(
                    f,
                    "Trip can no longer be accepted: pickup at {pickup_datetime} is inside the response cutoff"
                )
            }
            Self::AutoDeclineNotDue { pickup_datetime } => {
                write!(
                    f,
                    "Trip is not due for auto-decline: pickup at {pickup_datetime} is outside the response cutoff"
                )
            }
            Self::TimestampFormat { message } => {
                write!(f, "Timestamp formatting failed: {message}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
