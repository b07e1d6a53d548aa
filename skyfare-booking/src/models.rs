use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfare_inventory::Ticket;
use uuid::Uuid;

/// The unit a caller persists as the customer's itinerary: every ticket
/// booked in one coordinator call, under one owner and one shared
/// timestamp. Ephemeral: the durable state is the tickets themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingGroup {
    pub flight_id: Uuid,
    pub owner: String,
    pub booked_at: DateTime<Utc>,
    pub tickets: Vec<Ticket>,
    pub total_price_nuc: i32,
}

impl BookingGroup {
    pub fn new(flight_id: Uuid, owner: String, booked_at: DateTime<Utc>, tickets: Vec<Ticket>) -> Self {
        let total_price_nuc = tickets.iter().map(|t| t.price_nuc).sum();
        Self {
            flight_id,
            owner,
            booked_at,
            tickets,
            total_price_nuc,
        }
    }

    pub fn seat_numbers(&self) -> Vec<String> {
        self.tickets.iter().map(|t| t.seat_number.clone()).collect()
    }

    pub fn size(&self) -> usize {
        self.tickets.len()
    }
}
