// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Periodic auto-decline sweep task.
//!
//! Confirmed trips whose pickup is at or inside the 2-hour response
//! cutoff are declined on the client's behalf by a background pass. The
//! task here runs that pass on a fixed interval; `POST /trips/sweep`
//! runs the identical pass on demand.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error};
use tripdesk::NotificationKind;
use tripdesk_api::{ApiError, SweepReport, sweep_once};
use tripdesk_persistence::SqlitePersistence;

use crate::live::{NotificationBroadcaster, TripNotification};

/// Spawns the periodic auto-decline sweep task.
///
/// Each tick runs one pass and broadcasts a notification for every trip
/// the pass declined. The first tick completes immediately, so a
/// backlog left from downtime is cleared at startup. A failed pass is
/// logged and retried at the next tick; it never takes the server down.
pub fn spawn_sweep_task(
    persistence: Arc<Mutex<SqlitePersistence>>,
    broadcaster: Arc<NotificationBroadcaster>,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker: tokio::time::Interval =
            tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            debug!("Running periodic auto-decline sweep pass");

            // The pass takes the lock one trip at a time internally; the
            // outer lock is only held for the duration of the pass call.
            let mut store = persistence.lock().await;
            let outcome: Result<SweepReport, ApiError> = sweep_once(&mut store);
            drop(store);

            match outcome {
                Ok(report) => {
                    for trip in &report.declined_trips {
                        broadcaster.broadcast(&TripNotification::for_transition(
                            NotificationKind::TripAutoDeclined,
                            trip,
                        ));
                    }
                }
                Err(e) => {
                    error!(error = %e, "Periodic sweep pass failed");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripdesk_api::{
        ConfirmTripRequest, CreateTripRequest, GetTripRequest, Role, StaffActor, confirm_trip,
        create_trip, get_trip,
    };

    fn seed_confirmed_trip(persistence: &mut SqlitePersistence, hours_ahead: i64) -> i64 {
        let pickup: String = (time::OffsetDateTime::now_utc()
            + time::Duration::hours(hours_ahead))
        .format(&time::format_description::well_known::Rfc3339)
        .expect("Failed to format pickup datetime");

        let request: CreateTripRequest = CreateTripRequest {
            client_name: String::from("Dana Whitfield"),
            client_email: String::from("dana.whitfield@example.com"),
            client_phone: String::from("555-0142"),
            pickup_location: String::from("12 Harbor Way"),
            dropoff_location: String::from("Mercy General Hospital"),
            pickup_datetime: pickup,
            recurrence_config: None,
        };
        let created = create_trip(persistence, &request).expect("Failed to create trip");
        let trip_id: i64 = created.response.trip.trip_id;

        let manager: StaffActor = StaffActor::new(1, Role::Manager);
        confirm_trip(
            persistence,
            &ConfirmTripRequest {
                trip_id,
                price: String::from("45.00"),
                notes: None,
            },
            &manager,
        )
        .expect("Failed to confirm trip");

        trip_id
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_pass_declines_due_trip() {
        let mut store: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create persistence");
        let trip_id: i64 = seed_confirmed_trip(&mut store, 1);

        let persistence = Arc::new(Mutex::new(store));
        let broadcaster = Arc::new(NotificationBroadcaster::new());
        let handle = spawn_sweep_task(Arc::clone(&persistence), Arc::clone(&broadcaster), 60);

        // The first tick fires immediately; yield until it has run.
        tokio::time::sleep(Duration::from_millis(5)).await;
        handle.abort();

        let mut store = persistence.lock().await;
        let manager: StaffActor = StaffActor::new(1, Role::Manager);
        let fetched = get_trip(&mut store, &GetTripRequest { trip_id }, &manager)
            .expect("Failed to fetch trip");
        assert_eq!(fetched.trip.state, "auto_declined");
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_pass_leaves_far_future_trip_alone() {
        let mut store: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create persistence");
        let trip_id: i64 = seed_confirmed_trip(&mut store, 72);

        let persistence = Arc::new(Mutex::new(store));
        let broadcaster = Arc::new(NotificationBroadcaster::new());
        let handle = spawn_sweep_task(Arc::clone(&persistence), Arc::clone(&broadcaster), 60);

        tokio::time::sleep(Duration::from_millis(5)).await;
        handle.abort();

        let mut store = persistence.lock().await;
        let manager: StaffActor = StaffActor::new(1, Role::Manager);
        let fetched = get_trip(&mut store, &GetTripRequest { trip_id }, &manager)
            .expect("Failed to fetch trip");
        assert_eq!(fetched.trip.state, "confirmed");
    }
}
