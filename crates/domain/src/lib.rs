// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod price;
mod trip_state;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use price::Price;
pub use trip_state::{
    CLIENT_RESPONSE_CUTOFF, TripState, auto_decline_due, within_acceptance_window,
};
pub use types::{ClientContact, ScheduledTrip};
pub use validation::{validate_pickup_in_future, validate_trip_fields};
