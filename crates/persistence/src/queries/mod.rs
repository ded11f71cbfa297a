// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for the persistence layer.
//!
//! This module contains all read-only queries.
//!
//! ## Module Organization
//!
//! - `audit` — Audit timeline queries
//! - `trips` — Scheduled trip queries

pub mod audit;
pub mod trips;

pub use audit::get_audit_timeline;
pub use trips::{
    get_trip, get_trip_by_acceptance_token, get_trip_by_decline_token, list_sweep_candidates,
    list_trips,
};
