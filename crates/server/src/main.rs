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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use tripdesk::NotificationKind;
use tripdesk_api::{
    AcceptTripResponse, ApiError, ApiResult, CancelTripRequest, CancelTripResponse,
    ConfirmTripRequest, ConfirmTripResponse, CreateTripRequest, CreateTripResponse,
    DeclineTripResponse, GetTripAuditRequest, GetTripAuditResponse, GetTripRequest,
    GetTripResponse, ListTripsRequest, ListTripsResponse, SweepReport, accept_trip_by_token,
    cancel_trip, confirm_trip, create_trip, decline_trip_by_token, get_trip,
    get_trip_audit_timeline, list_trips, run_auto_decline_sweep,
};
use tripdesk_persistence::SqlitePersistence;

mod live;
mod session;
mod sweep;

use live::{
    NotificationBroadcaster, TripNotification, notifications_handler, spawn_dispatch_worker,
};
use session::StaffIdentity;
use sweep::spawn_sweep_task;

/// TripDesk Server - HTTP server for the TripDesk fleet operations backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Seconds between auto-decline sweep passes
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access, plus the broadcaster feeding the live
/// notification stream and the dispatch worker.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for trips and their audit timelines.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Fan-out channel for committed transition notifications.
    broadcaster: Arc<NotificationBroadcaster>,
}

/// API request for creating a trip.
///
/// Trip creation is the public booking surface and carries no staff
/// identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateTripApiRequest {
    /// The requesting client's full name.
    client_name: String,
    /// The client's email address (where the response links are sent).
    client_email: String,
    /// The client's phone number.
    client_phone: String,
    /// Where the client is picked up.
    pickup_location: String,
    /// Where the client is dropped off.
    dropoff_location: String,
    /// When the pickup happens (RFC 3339, must be future-dated).
    pickup_datetime: String,
    /// Optional recurrence payload, stored opaquely as JSON text.
    recurrence_config: Option<String>,
}

/// API request for confirming a trip with a quoted price.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ConfirmTripApiRequest {
    /// The price quoted to the client, as a decimal string ("45.00").
    price: String,
    /// Optional review notes, recorded on the trip.
    notes: Option<String>,
}

/// API request for cancelling a trip.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelTripApiRequest {
    /// Optional reason, recorded in the audit trail.
    reason: Option<String>,
}

/// Query parameters for listing trips.
#[derive(Debug, Deserialize)]
struct ListTripsQuery {
    /// Restrict results to one lifecycle state, by its string form.
    state: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            // The generic token failure reads as "no such link"
            ApiError::InvalidToken => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::InvalidState { .. } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::StorageContention { .. } => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error reached the HTTP boundary");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Handler for POST /trips endpoint.
///
/// Public booking surface: validates the request, persists the pending
/// trip with its creation audit entry, and returns the snapshot together
/// with the response tokens for the outbound email.
async fn handle_create_trip(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateTripApiRequest>,
) -> Result<Json<CreateTripResponse>, HttpError> {
    info!(
        client_name = %req.client_name,
        pickup_datetime = %req.pickup_datetime,
        "Handling create_trip request"
    );

    let request: CreateTripRequest = CreateTripRequest {
        client_name: req.client_name,
        client_email: req.client_email,
        client_phone: req.client_phone,
        pickup_location: req.pickup_location,
        dropoff_location: req.dropoff_location,
        pickup_datetime: req.pickup_datetime,
        recurrence_config: req.recurrence_config,
    };

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<CreateTripResponse> = create_trip(&mut persistence, &request)?;
    drop(persistence);

    // Fan-out happens after the commit, never inside it
    app_state
        .broadcaster
        .broadcast(&TripNotification::for_transition(
            result.notification,
            &result.response.trip,
        ));

    info!(
        trip_id = result.response.trip.trip_id,
        "Successfully created trip"
    );

    Ok(Json(result.response))
}

/// Handler for GET /trips endpoint.
///
/// Staff-only listing, optionally filtered to one lifecycle state.
async fn handle_list_trips(
    AxumState(app_state): AxumState<AppState>,
    StaffIdentity(actor): StaffIdentity,
    Query(params): Query<ListTripsQuery>,
) -> Result<Json<ListTripsResponse>, HttpError> {
    info!(
        staff_id = actor.staff_id,
        state = ?params.state,
        "Handling list_trips request"
    );

    let request: ListTripsRequest = ListTripsRequest {
        state: params.state,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListTripsResponse = list_trips(&mut persistence, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/trips/{trip_id}` endpoint.
///
/// Returns the staff snapshot of one trip. Response tokens never appear
/// here.
async fn handle_get_trip(
    AxumState(app_state): AxumState<AppState>,
    StaffIdentity(actor): StaffIdentity,
    Path(trip_id): Path<i64>,
) -> Result<Json<GetTripResponse>, HttpError> {
    info!(
        staff_id = actor.staff_id,
        trip_id, "Handling get_trip request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GetTripResponse =
        get_trip(&mut persistence, &GetTripRequest { trip_id }, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/trips/{trip_id}/audit` endpoint.
///
/// Returns the trip's full audit timeline, creation entry first.
async fn handle_get_trip_audit(
    AxumState(app_state): AxumState<AppState>,
    StaffIdentity(actor): StaffIdentity,
    Path(trip_id): Path<i64>,
) -> Result<Json<GetTripAuditResponse>, HttpError> {
    info!(
        staff_id = actor.staff_id,
        trip_id, "Handling get_trip_audit request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GetTripAuditResponse =
        get_trip_audit_timeline(&mut persistence, &GetTripAuditRequest { trip_id }, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/trips/{trip_id}/confirm` endpoint.
///
/// Manager review: quotes the price and moves the trip to `confirmed`.
async fn handle_confirm_trip(
    AxumState(app_state): AxumState<AppState>,
    StaffIdentity(actor): StaffIdentity,
    Path(trip_id): Path<i64>,
    Json(req): Json<ConfirmTripApiRequest>,
) -> Result<Json<ConfirmTripResponse>, HttpError> {
    info!(
        staff_id = actor.staff_id,
        trip_id,
        price = %req.price,
        "Handling confirm_trip request"
    );

    let request: ConfirmTripRequest = ConfirmTripRequest {
        trip_id,
        price: req.price,
        notes: req.notes,
    };

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ConfirmTripResponse> = confirm_trip(&mut persistence, &request, &actor)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&TripNotification::for_transition(
            result.notification,
            &result.response.trip,
        ));

    info!(trip_id, "Successfully confirmed trip");

    Ok(Json(result.response))
}

/// Handler for POST `/trips/{trip_id}/cancel` endpoint.
///
/// Staff cancellation, valid from `pending` or `confirmed`.
async fn handle_cancel_trip(
    AxumState(app_state): AxumState<AppState>,
    StaffIdentity(actor): StaffIdentity,
    Path(trip_id): Path<i64>,
    Json(req): Json<CancelTripApiRequest>,
) -> Result<Json<CancelTripResponse>, HttpError> {
    info!(
        staff_id = actor.staff_id,
        trip_id, "Handling cancel_trip request"
    );

    let request: CancelTripRequest = CancelTripRequest {
        trip_id,
        reason: req.reason,
    };

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<CancelTripResponse> = cancel_trip(&mut persistence, &request, &actor)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&TripNotification::for_transition(
            result.notification,
            &result.response.trip,
        ));

    info!(trip_id, "Successfully cancelled trip");

    Ok(Json(result.response))
}

/// Handler for GET `/trips/respond/accept/{token}` endpoint.
///
/// Public surface behind the emailed acceptance link. The token is a
/// capability secret and stays out of the logs.
async fn handle_accept_trip(
    AxumState(app_state): AxumState<AppState>,
    Path(token): Path<String>,
) -> Result<Json<AcceptTripResponse>, HttpError> {
    info!("Handling accept_trip request");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<AcceptTripResponse> = accept_trip_by_token(&mut persistence, &token)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&TripNotification::for_transition(
            result.notification,
            &result.response.trip,
        ));

    info!(
        trip_id = result.response.trip.trip_id,
        "Trip accepted by client"
    );

    Ok(Json(result.response))
}

/// Handler for GET `/trips/respond/decline/{token}` endpoint.
///
/// Public surface behind the emailed decline link. The token is a
/// capability secret and stays out of the logs.
async fn handle_decline_trip(
    AxumState(app_state): AxumState<AppState>,
    Path(token): Path<String>,
) -> Result<Json<DeclineTripResponse>, HttpError> {
    info!("Handling decline_trip request");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<DeclineTripResponse> = decline_trip_by_token(&mut persistence, &token)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&TripNotification::for_transition(
            result.notification,
            &result.response.trip,
        ));

    info!(
        trip_id = result.response.trip.trip_id,
        "Trip declined by client"
    );

    Ok(Json(result.response))
}

/// Handler for POST /trips/sweep endpoint.
///
/// Manual trigger for one auto-decline sweep pass (manager only). Runs
/// the same pass the periodic task runs and returns its report.
async fn handle_run_sweep(
    AxumState(app_state): AxumState<AppState>,
    StaffIdentity(actor): StaffIdentity,
) -> Result<Json<SweepReport>, HttpError> {
    info!(staff_id = actor.staff_id, "Handling manual sweep request");

    let mut persistence = app_state.persistence.lock().await;
    let report: SweepReport = run_auto_decline_sweep(&mut persistence, &actor)?;
    drop(persistence);

    for trip in &report.declined_trips {
        app_state
            .broadcaster
            .broadcast(&TripNotification::for_transition(
                NotificationKind::TripAutoDeclined,
                trip,
            ));
    }

    Ok(Json(report))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/trips", post(handle_create_trip))
        .route("/trips", get(handle_list_trips))
        .route("/trips/{trip_id}", get(handle_get_trip))
        .route("/trips/{trip_id}/audit", get(handle_get_trip_audit))
        .route("/trips/{trip_id}/confirm", post(handle_confirm_trip))
        .route("/trips/{trip_id}/cancel", post(handle_cancel_trip))
        .route("/trips/respond/accept/{token}", get(handle_accept_trip))
        .route("/trips/respond/decline/{token}", get(handle_decline_trip))
        .route("/trips/sweep", post(handle_run_sweep))
        .route("/notifications/live", get(notifications_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing TripDesk Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        broadcaster: Arc::new(NotificationBroadcaster::new()),
    };

    // Both workers run for the life of the process; dropping the handles
    // detaches them
    let _dispatch_worker = spawn_dispatch_worker(&app_state.broadcaster);
    let _sweep_task = spawn_sweep_task(
        Arc::clone(&app_state.persistence),
        Arc::clone(&app_state.broadcaster),
        args.sweep_interval_secs,
    );

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
