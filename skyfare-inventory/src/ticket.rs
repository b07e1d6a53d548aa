use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfare_catalog::{CabinClass, SeatTemplate};
use skyfare_shared::Passenger;
use uuid::Uuid;

/// Ticket state machine:
///
/// ```text
/// FREE --reserve--> BOOKED --reschedule--> DELAYED
/// BOOKED/DELAYED --flight completes--> ONTIME
/// BOOKED/DELAYED --cancel--> CANCELLED (terminal under the default policy)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Free,
    Booked,
    Delayed,
    /// Set when the flight completes. That transition is driven by the
    /// operations system that closes out flights, not by any booking or
    /// cascade path here; the variant exists so its rows deserialize and
    /// keep the owner invariant.
    Ontime,
    Cancelled,
}

impl TicketStatus {
    /// Statuses that must carry an owner. The inverse also holds: a ticket
    /// in any other status carries no owner.
    pub fn requires_owner(self) -> bool {
        matches!(
            self,
            TicketStatus::Booked | TicketStatus::Delayed | TicketStatus::Ontime
        )
    }
}

/// The sellable unit: one seat on one specific flight.
///
/// The version counter is the only serialization primitive in the engine;
/// every mutation goes through the store's compare-and-swap against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub seat_id: Uuid,
    pub seat_number: String,
    pub cabin: CabinClass,
    pub price_nuc: i32,
    pub status: TicketStatus,
    pub owner: Option<String>,
    pub passenger: Option<Passenger>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// A ticket is born free and ownerless when its flight's inventory is
    /// materialized.
    pub fn new(flight_id: Uuid, seat: &SeatTemplate, price_nuc: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            flight_id,
            seat_id: seat.id,
            seat_number: seat.number.clone(),
            cabin: seat.cabin,
            price_nuc,
            status: TicketStatus::Free,
            owner: None,
            passenger: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Owner present iff the status requires one.
    pub fn invariant_holds(&self) -> bool {
        self.owner.is_some() == self.status.requires_owner()
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner.as_deref() == Some(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfare_catalog::SeatTemplate;

    #[test]
    fn test_new_ticket_is_free_and_ownerless() {
        let seat = SeatTemplate::new("12A", CabinClass::Economy, true);
        let ticket = Ticket::new(Uuid::new_v4(), &seat, 100);
        assert_eq!(ticket.status, TicketStatus::Free);
        assert!(ticket.owner.is_none());
        assert!(ticket.passenger.is_none());
        assert_eq!(ticket.version, 0);
        assert!(ticket.invariant_holds());
    }

    #[test]
    fn test_owner_requirement_per_status() {
        assert!(!TicketStatus::Free.requires_owner());
        assert!(TicketStatus::Booked.requires_owner());
        assert!(TicketStatus::Delayed.requires_owner());
        assert!(TicketStatus::Ontime.requires_owner());
        assert!(!TicketStatus::Cancelled.requires_owner());
    }
}
