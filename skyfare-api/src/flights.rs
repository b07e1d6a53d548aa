use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfare_booking::CascadeOutcome;
use skyfare_catalog::{Aircraft, CabinClass, Flight};
use skyfare_inventory::{Availability, DelayRecord};
use skyfare_shared::events::FlightRescheduledEvent;
use skyfare_shared::EngineEvent;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SeatRequest {
    pub number: String,
    pub cabin: CabinClass,
    #[serde(default)]
    pub window: bool,
}

#[derive(Debug, Deserialize)]
pub struct AircraftRequest {
    pub name: String,
    pub manufacturer: String,
    pub seats: Vec<SeatRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub designator: String,
    pub departure_city: String,
    pub departure_code: String,
    pub arrival_city: String,
    pub arrival_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub gate: String,
    pub aircraft: AircraftRequest,
}

#[derive(Debug, Serialize)]
pub struct CreateFlightResponse {
    pub flight: Flight,
    pub tickets_created: usize,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub class: CabinClass,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights", get(list_flights).post(create_flight))
        .route("/v1/flights/{id}", get(get_flight))
        .route("/v1/flights/{id}/availability", get(availability))
        .route("/v1/flights/{id}/schedule", post(apply_schedule))
        .route("/v1/flights/{id}/delays", get(delay_history))
}

/// Admin flight creation. Registers the flight and materializes its seat
/// inventory in the same call, so every ticket exists as FREE before the
/// first booking request can arrive.
async fn create_flight(
    State(state): State<AppState>,
    Json(req): Json<CreateFlightRequest>,
) -> Result<Json<CreateFlightResponse>, ApiError> {
    if req.aircraft.seats.is_empty() {
        return Err(ApiError::BadRequest(
            "aircraft needs at least one seat".to_string(),
        ));
    }

    let mut aircraft = Aircraft::new(req.aircraft.name, req.aircraft.manufacturer);
    for seat in req.aircraft.seats {
        aircraft.add_seat(seat.number, seat.cabin, seat.window);
    }

    let flight = Flight::new(
        req.designator,
        req.departure_city,
        req.departure_code,
        req.arrival_city,
        req.arrival_code,
        req.departure_time,
        req.arrival_time,
        req.gate,
        aircraft.id,
    )
    .map_err(|e| ApiError::UnprocessableError(e.to_string()))?;

    state.flights.insert(flight.clone())?;
    let tickets = state
        .tickets
        .create_inventory(&flight, &aircraft, &state.pricing)?;
    state.aircraft.insert(aircraft);

    info!(flight_id = %flight.id, designator = %flight.designator, "flight created");
    Ok(Json(CreateFlightResponse {
        tickets_created: tickets.len(),
        flight,
    }))
}

async fn list_flights(State(state): State<AppState>) -> Json<Vec<Flight>> {
    Json(state.flights.list())
}

async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Flight>, ApiError> {
    Ok(Json(state.flights.get(id)?))
}

async fn availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Availability>, ApiError> {
    Ok(Json(state.tickets.availability(id, params.class)?))
}

/// Admin reschedule: the delay cascade trigger.
async fn apply_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<CascadeOutcome>, ApiError> {
    let outcome =
        state
            .cascade
            .apply_schedule(id, req.departure_time, req.arrival_time, req.reason)?;

    let _ = state
        .events_tx
        .send(EngineEvent::FlightRescheduled(FlightRescheduledEvent {
            flight_id: outcome.flight.id,
            designator: outcome.flight.designator.clone(),
            new_departure: outcome.flight.departure_time,
            new_arrival: outcome.flight.arrival_time,
            affected_tickets: outcome.affected,
            occurred_at: Utc::now(),
        }));

    Ok(Json(outcome))
}

async fn delay_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DelayRecord>>, ApiError> {
    // 404 for flights that were never registered
    state.flights.get(id)?;
    Ok(Json(state.flights.delay_history(id)))
}
