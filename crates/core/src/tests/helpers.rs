// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, OffsetDateTime};
use tripdesk_domain::{ClientContact, Price, ScheduledTrip, TripState};

/// A fixed "now" so guard tests are deterministic.
pub fn test_now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

pub fn create_test_client() -> ClientContact {
    ClientContact::new(
        String::from("Avery Client"),
        String::from("avery@example.com"),
        String::from("+1-555-0100"),
    )
}

/// A persisted pending trip whose pickup is `pickup_offset` after `now`.
pub fn create_pending_trip(now: OffsetDateTime, pickup_offset: Duration) -> ScheduledTrip {
    let mut trip: ScheduledTrip = ScheduledTrip::new(
        create_test_client(),
        String::from("12 Harbor St"),
        String::from("Airport Terminal B"),
        now + pickup_offset,
        None,
        String::from("acceptance-token"),
        String::from("decline-token"),
        now,
    );
    trip.trip_id = Some(1);
    trip
}

/// A persisted confirmed trip, as if staff had already reviewed it.
pub fn create_confirmed_trip(now: OffsetDateTime, pickup_offset: Duration) -> ScheduledTrip {
    let mut trip: ScheduledTrip = create_pending_trip(now, pickup_offset);
    trip.state = TripState::Confirmed;
    trip.price = Some(Price::from_cents(4500));
    trip.reviewed_by_id = Some(3);
    trip.reviewed_at = Some(now);
    trip
}
