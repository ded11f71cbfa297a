// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the TripDesk fleet operations backend.
//!
//! # Storage Model
//!
//! Two tables back the trip lifecycle:
//!
//! - `scheduled_trips` holds one row per trip request, including the
//!   current lifecycle state, the client-facing response tokens, and the
//!   staff review fields.
//! - `scheduled_trip_audit_logs` holds the append-only audit trail. Each
//!   row records one state change (or the trip's creation) with the
//!   acting party and the reason.
//!
//! # Write Contract
//!
//! Every state change runs inside an immediate transaction: the trip row
//! update and the audit row insert land together or not at all. Updates
//! are conditional on the state the caller observed, so a transition that
//! lost a race rolls back with [`PersistenceError::StateConflict`] and
//! leaves no trace in the audit trail.
//!
//! # Testing
//!
//! In-memory test databases use a process-wide counter to generate unique
//! shared-cache names, so tests can run in parallel without sharing
//! state. File-backed databases additionally get WAL mode and a busy
//! timeout for concurrent server and sweep access.

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

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tripdesk::TransitionResult;
use tripdesk_audit::AuditEntry;
use tripdesk_domain::{ScheduledTrip, TripState};

/// Global counter for generating unique in-memory database names.
///
/// Each test gets its own shared-cache in-memory database, preventing
/// cross-test contamination when tests run in parallel.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::TripAuditRecord;
pub use error::PersistenceError;

/// Type alias kept for call sites that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// SQLite-backed persistence for trips and their audit trail.
///
/// Holds a single connection. The server wraps this in a mutex shared
/// between request handlers and the auto-decline sweep.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new in-memory database for testing.
    ///
    /// Each call gets a unique shared-cache database name, so separate
    /// instances never observe each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established, the
    /// migrations fail, or foreign key enforcement cannot be verified.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn = sqlite::initialize_database(&db_name)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Opens (or creates) a file-backed database.
    ///
    /// # Arguments
    ///
    /// * `path` - Filesystem path for the SQLite database file
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8, the connection
    /// cannot be established, the migrations fail, or foreign key
    /// enforcement cannot be verified.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let Some(database_url) = path.as_ref().to_str() else {
            return Err(PersistenceError::InitializationError(
                "Invalid database path".to_string(),
            ));
        };

        let mut conn = sqlite::initialize_database(database_url)?;

        // WAL keeps reads and the sweep from blocking behind transition
        // writes.
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::set_busy_timeout(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled on this
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::ForeignKeyEnforcementNotEnabled`] if
    /// the pragma is off, or a query error if it cannot be read.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ==== Trip Mutations ====

    /// Persists a newly requested trip together with its creation audit
    /// entry.
    ///
    /// Both rows are written in one immediate transaction. The trip's
    /// `id` field is assigned by the database; the returned value is the
    /// new row id.
    ///
    /// # Arguments
    ///
    /// * `trip` - The trip to persist (its `trip_id` is ignored)
    /// * `creation_entry` - Audit entry recording the creation
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateToken`] if either response
    /// token collides with an existing trip, or a database error if the
    /// write fails.
    pub fn create_trip(
        &mut self,
        trip: &ScheduledTrip,
        creation_entry: &AuditEntry,
    ) -> Result<i64, PersistenceError> {
        mutations::create_trip(&mut self.conn, trip, creation_entry)
    }

    /// Applies a computed transition to a stored trip.
    ///
    /// The update is conditional on the trip still being in
    /// `expected_state`. Inside one immediate transaction the trip row is
    /// updated and the transition's audit entry is appended; if the state
    /// no longer matches, nothing is written.
    ///
    /// # Arguments
    ///
    /// * `trip_id` - The stored trip to update
    /// * `expected_state` - The state the caller observed before
    ///   computing the transition
    /// * `result` - The updated trip and audit entry to persist
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::StateConflict`] if the trip moved to a
    /// different state since it was read, [`PersistenceError::TripNotFound`]
    /// if the trip does not exist, or a database error if the write fails.
    pub fn persist_transition(
        &mut self,
        trip_id: i64,
        expected_state: TripState,
        result: &TransitionResult,
    ) -> Result<(), PersistenceError> {
        mutations::persist_transition(&mut self.conn, trip_id, expected_state, result)
    }

    // ==== Trip Queries ====

    /// Loads a trip by its row id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::TripNotFound`] if no trip has that id,
    /// or a database error if the query fails.
    pub fn get_trip(&mut self, trip_id: i64) -> Result<ScheduledTrip, PersistenceError> {
        queries::get_trip(&mut self.conn, trip_id)
    }

    /// Loads a trip by its acceptance token.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::TokenNotFound`] if no trip carries the
    /// token, or a database error if the query fails.
    pub fn get_trip_by_acceptance_token(
        &mut self,
        token: &str,
    ) -> Result<ScheduledTrip, PersistenceError> {
        queries::get_trip_by_acceptance_token(&mut self.conn, token)
    }

    /// Loads a trip by its decline token.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::TokenNotFound`] if no trip carries the
    /// token, or a database error if the query fails.
    pub fn get_trip_by_decline_token(
        &mut self,
        token: &str,
    ) -> Result<ScheduledTrip, PersistenceError> {
        queries::get_trip_by_decline_token(&mut self.conn, token)
    }

    /// Lists trips, optionally filtered to a single lifecycle state,
    /// ordered by pickup time.
    ///
    /// # Arguments
    ///
    /// * `state` - When `Some`, only trips currently in that state
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be
    /// reconstructed.
    pub fn list_trips(
        &mut self,
        state: Option<TripState>,
    ) -> Result<Vec<ScheduledTrip>, PersistenceError> {
        queries::list_trips(&mut self.conn, state)
    }

    /// Lists the auto-decline sweep's candidates: confirmed trips whose
    /// pickup is at or inside the response cutoff, soonest first.
    ///
    /// # Arguments
    ///
    /// * `now` - The sweep's wall-clock reading
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be
    /// reconstructed.
    pub fn list_sweep_candidates(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<ScheduledTrip>, PersistenceError> {
        queries::list_sweep_candidates(&mut self.conn, now)
    }

    // ==== Audit Queries ====

    /// Loads the full audit timeline for a trip, oldest entry first.
    ///
    /// An empty result means no entries exist for that trip id; callers
    /// that need to distinguish a missing trip should load the trip
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be
    /// reconstructed.
    pub fn get_audit_timeline(
        &mut self,
        trip_id: i64,
    ) -> Result<Vec<TripAuditRecord>, PersistenceError> {
        queries::get_audit_timeline(&mut self.conn, trip_id)
    }
}
