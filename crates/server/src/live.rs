// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification fan-out for committed trip transitions.
//!
//! Every successful state change produces exactly one notification,
//! derived from the transition after it commits. This module carries
//! those notifications to two consumers: operator UIs subscribed to the
//! WebSocket stream, and the dispatch worker that records the outbound
//! client send (actual mail delivery is owned by external
//! infrastructure).
//!
//! # Architecture
//!
//! - Notifications are broadcast to all connected clients
//! - Notifications are informational only and never authoritative
//! - Dispatch is best-effort: a slow or absent consumer can never stall
//!   or abort a state transition
//! - No commands are executed over WebSocket connections
//! - Clients must still query trips via HTTP for authoritative data

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tripdesk::NotificationKind;
use tripdesk_api::TripInfo;

use crate::AppState;

/// Maximum number of notifications to buffer in the broadcast channel.
/// If consumers cannot keep up, older notifications will be dropped.
const NOTIFICATION_BUFFER_SIZE: usize = 100;

/// Outbound notification for one committed trip transition.
///
/// These are derived from successful state changes, not the source of
/// truth. The response tokens never appear here: the stream reaches
/// every connected operator UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripNotification {
    /// A trip was created and is awaiting review.
    TripCreated {
        /// The trip identifier.
        trip_id: i64,
        /// The client's email address (the send target).
        client_email: String,
        /// The requested pickup time (RFC 3339).
        pickup_datetime: String,
    },
    /// Staff confirmed a trip; the client is asked to respond.
    TripConfirmed {
        /// The trip identifier.
        trip_id: i64,
        /// The client's email address (the send target).
        client_email: String,
        /// The quoted price as a decimal string.
        price: Option<String>,
    },
    /// The client accepted a confirmed trip.
    TripAccepted {
        /// The trip identifier.
        trip_id: i64,
        /// The client's email address (the send target).
        client_email: String,
    },
    /// The trip was declined by staff or by the client.
    TripDeclined {
        /// The trip identifier.
        trip_id: i64,
        /// The client's email address (the send target).
        client_email: String,
    },
    /// The sweep declined a trip that got no response in time.
    TripAutoDeclined {
        /// The trip identifier.
        trip_id: i64,
        /// The client's email address (the send target).
        client_email: String,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
}

impl TripNotification {
    /// Builds the notification for a committed transition from the kind
    /// the lifecycle core reported and the resulting trip snapshot.
    #[must_use]
    pub fn for_transition(kind: NotificationKind, trip: &TripInfo) -> Self {
        match kind {
            NotificationKind::TripCreated => Self::TripCreated {
                trip_id: trip.trip_id,
                client_email: trip.client_email.clone(),
                pickup_datetime: trip.pickup_datetime.clone(),
            },
            NotificationKind::TripConfirmed => Self::TripConfirmed {
                trip_id: trip.trip_id,
                client_email: trip.client_email.clone(),
                price: trip.price.clone(),
            },
            NotificationKind::TripAccepted => Self::TripAccepted {
                trip_id: trip.trip_id,
                client_email: trip.client_email.clone(),
            },
            NotificationKind::TripDeclined => Self::TripDeclined {
                trip_id: trip.trip_id,
                client_email: trip.client_email.clone(),
            },
            NotificationKind::TripAutoDeclined => Self::TripAutoDeclined {
                trip_id: trip.trip_id,
                client_email: trip.client_email.clone(),
            },
        }
    }
}

/// Broadcaster for trip notifications.
///
/// This is a lightweight wrapper around `tokio::sync::broadcast` that
/// allows multiple consumers to receive transition notifications.
#[derive(Clone)]
pub struct NotificationBroadcaster {
    /// The broadcast channel sender.
    tx: broadcast::Sender<TripNotification>,
}

impl NotificationBroadcaster {
    /// Creates a new notification broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(NOTIFICATION_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts a notification to all connected consumers.
    ///
    /// If no consumers are connected, the notification is silently
    /// dropped. This is non-blocking and will not wait for consumers to
    /// receive the notification.
    pub fn broadcast(&self, notification: &TripNotification) {
        match self.tx.send(notification.clone()) {
            Ok(count) => {
                debug!(?notification, receivers = count, "Broadcast trip notification");
            }
            Err(_) => {
                // No receivers, which is fine
                debug!(?notification, "No receivers for trip notification");
            }
        }
    }

    /// Subscribes to the notification stream.
    ///
    /// Returns a receiver that will receive all future notifications.
    /// Notifications sent before subscription are not received.
    fn subscribe(&self) -> broadcast::Receiver<TripNotification> {
        self.tx.subscribe()
    }
}

impl Default for NotificationBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the notification dispatch worker.
///
/// The worker subscribes to the broadcast stream and records each
/// outbound client send. Delivery mechanics live in the mail
/// infrastructure; here a send is a structured log line, and a failure
/// can only ever be logged, never surfaced to the request that caused
/// the transition.
pub fn spawn_dispatch_worker(broadcaster: &NotificationBroadcaster) -> tokio::task::JoinHandle<()> {
    let mut rx: broadcast::Receiver<TripNotification> = broadcaster.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(notification) => dispatch_notification(&notification),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "Dispatch worker fell behind the notification stream");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Records one outbound client send.
fn dispatch_notification(notification: &TripNotification) {
    match notification {
        TripNotification::TripCreated {
            trip_id,
            client_email,
            pickup_datetime,
        } => {
            info!(
                trip_id,
                recipient = %client_email,
                pickup_datetime = %pickup_datetime,
                "Dispatched trip-received notification"
            );
        }
        TripNotification::TripConfirmed {
            trip_id,
            client_email,
            price,
        } => {
            info!(
                trip_id,
                recipient = %client_email,
                price = ?price,
                "Dispatched confirmation notification with response links"
            );
        }
        TripNotification::TripAccepted {
            trip_id,
            client_email,
        } => {
            info!(trip_id, recipient = %client_email, "Dispatched acceptance notification");
        }
        TripNotification::TripDeclined {
            trip_id,
            client_email,
        } => {
            info!(trip_id, recipient = %client_email, "Dispatched decline notification");
        }
        TripNotification::TripAutoDeclined {
            trip_id,
            client_email,
        } => {
            info!(trip_id, recipient = %client_email, "Dispatched auto-decline notification");
        }
        TripNotification::Connected { .. } => {}
    }
}

/// WebSocket handler that upgrades HTTP connections and streams trip
/// notifications.
///
/// This handler:
/// - Accepts WebSocket upgrade requests
/// - Sends a connection confirmation notification
/// - Streams all future trip notifications to the client
/// - Handles client disconnections gracefully
///
/// # Arguments
///
/// * `ws` - WebSocket upgrade request
/// * `app_state` - Application state carrying the broadcaster
///
/// # Returns
///
/// An HTTP response that upgrades the connection to WebSocket
pub async fn notifications_handler(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state.broadcaster))
}

/// Handles an individual WebSocket connection.
///
/// Sends a connection confirmation, then streams all trip notifications
/// until the client disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<NotificationBroadcaster>) {
    info!("Client connected to notification stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<TripNotification> = broadcaster.subscribe();

    // Send connection confirmation
    let connected: TripNotification = TripNotification::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    // Task for sending notifications to the client
    let mut send_task = tokio::spawn(async move {
        while let Ok(notification) = rx.recv().await {
            match serde_json::to_string(&notification) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        // Client disconnected
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize trip notification");
                }
            }
        }
    });

    // Task for receiving messages from the client (though we don't expect any)
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    // We don't process commands over WebSocket
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Ping/pong handled automatically by Axum
                }
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from notification stream");
}
