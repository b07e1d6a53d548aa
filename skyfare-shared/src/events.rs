use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketsBookedEvent {
    pub flight_id: Uuid,
    pub owner: String,
    pub seat_numbers: Vec<String>,
    pub total_price_nuc: i32,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCancelledEvent {
    pub ticket_id: Uuid,
    pub flight_id: Uuid,
    pub seat_number: String,
    pub owner: String,
    pub cancelled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRescheduledEvent {
    pub flight_id: Uuid,
    pub designator: String,
    pub new_departure: DateTime<Utc>,
    pub new_arrival: DateTime<Utc>,
    pub affected_tickets: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Fan-out envelope published on the in-process broadcast channel after a
/// successful engine operation. Downstream consumers (notification senders,
/// SSE streams) subscribe to this; delivery is their concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    TicketsBooked(TicketsBookedEvent),
    TicketCancelled(TicketCancelledEvent),
    FlightRescheduled(FlightRescheduledEvent),
}
