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

mod apply;
mod error;
mod event;
mod request;
mod result;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{
    ACCEPT_REASON, AUTO_DECLINE_REASON, CLIENT_DECLINE_REASON, CONFIRM_REASON, CREATION_REASON,
    STAFF_CANCEL_REASON, apply, creation_entry,
};
pub use error::CoreError;
pub use event::{NotificationKind, TripEvent};
pub use request::TransitionRequest;
pub use result::TransitionResult;
