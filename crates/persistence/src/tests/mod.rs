// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_timeline_tests;
mod initialization_tests;
mod transition_tests;

use time::{Duration, OffsetDateTime};
use tripdesk_domain::{ClientContact, ScheduledTrip};

/// Fixed test clock: 2023-11-14T22:13:20Z.
pub fn test_now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("Valid test timestamp")
}

pub fn create_test_client() -> ClientContact {
    ClientContact::new(
        String::from("Avery Client"),
        String::from("avery@example.com"),
        String::from("+1-555-0100"),
    )
}

/// Creates an unpersisted pending trip with pickup six hours after the
/// test clock.
pub fn create_test_trip(acceptance_token: &str, decline_token: &str) -> ScheduledTrip {
    let now: OffsetDateTime = test_now();
    ScheduledTrip::new(
        create_test_client(),
        String::from("12 Dock Road"),
        String::from("Airport Terminal 2"),
        now + Duration::hours(6),
        None,
        String::from(acceptance_token),
        String::from(decline_token),
        now,
    )
}
