// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// No trip exists with the given identifier.
    TripNotFound(i64),
    /// No trip matches the supplied response token.
    TokenNotFound,
    /// A conditional update found the trip in a different state than expected.
    StateConflict {
        trip_id: i64,
        expected: String,
        actual: String,
    },
    /// An insert collided with an existing response token.
    DuplicateToken(String),
    /// The database is locked by a concurrent writer.
    Busy(String),
    /// A stored row could not be mapped back to a domain value.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::TripNotFound(id) => write!(f, "Trip not found: {id}"),
            Self::TokenNotFound => write!(f, "No trip matches the supplied response token"),
            Self::StateConflict {
                trip_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Trip {trip_id} state conflict: expected '{expected}', found '{actual}'"
                )
            }
            Self::DuplicateToken(msg) => write!(f, "Duplicate response token: {msg}"),
            Self::Busy(msg) => write!(f, "Database busy: {msg}"),
            Self::ReconstructionError(msg) => {
                write!(f, "Stored row could not be reconstructed: {msg}")
            }
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound(String::from("Record not found")),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::DuplicateToken(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(kind, info) => {
                let message: String = info.message().to_string();
                // SQLite reports lock contention as a generic database error.
                if message.contains("database is locked") || message.contains("busy") {
                    Self::Busy(message)
                } else {
                    Self::DatabaseError(format!("{kind:?}: {message}"))
                }
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
