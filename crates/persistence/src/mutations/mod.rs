// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for the persistence layer.
//!
//! This module contains all state-changing operations. Trip mutations
//! open their own immediate transactions so the trip row and its audit
//! row always land together.
//!
//! ## Module Organization
//!
//! - `audit` — Audit log row insertion (transaction-scoped helper)
//! - `trips` — Trip creation and transition persistence

pub mod audit;
pub mod trips;

pub use trips::{create_trip, persist_transition};
