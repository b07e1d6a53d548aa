use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use skyfare_booking::BookingGroup;
use skyfare_catalog::CabinClass;
use skyfare_inventory::Ticket;
use skyfare_shared::events::{TicketCancelledEvent, TicketsBookedEvent};
use skyfare_shared::{EngineEvent, Passenger};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub class: CabinClass,
    /// The booking customer. Always explicit in the request; the engine
    /// never infers the owner from ambient session state.
    pub owner: String,
    pub passengers: Vec<Passenger>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub owner: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights/{id}/reserve", post(reserve))
        .route("/v1/tickets/{id}/cancel", post(cancel))
}

async fn reserve(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
    Json(req): Json<ReserveRequest>,
) -> Result<Json<BookingGroup>, ApiError> {
    let group = state
        .coordinator
        .reserve(flight_id, req.class, req.passengers, &req.owner)?;

    let _ = state
        .events_tx
        .send(EngineEvent::TicketsBooked(TicketsBookedEvent {
            flight_id,
            owner: group.owner.clone(),
            seat_numbers: group.seat_numbers(),
            total_price_nuc: group.total_price_nuc,
            booked_at: group.booked_at,
        }));

    info!(%flight_id, owner = %group.owner, seats = group.size(), "booking confirmed");
    Ok(Json(group))
}

async fn cancel(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state.cancellations.cancel(ticket_id, &req.owner)?;

    let _ = state
        .events_tx
        .send(EngineEvent::TicketCancelled(TicketCancelledEvent {
            ticket_id: ticket.id,
            flight_id: ticket.flight_id,
            seat_number: ticket.seat_number.clone(),
            owner: req.owner,
            cancelled_at: Utc::now(),
        }));

    Ok(Json(ticket))
}
