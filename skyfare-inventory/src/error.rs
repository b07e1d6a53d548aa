use skyfare_catalog::CabinClass;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("ticket not found: {0}")]
    TicketNotFound(Uuid),

    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("no ticket for seat {seat_id} on flight {flight_id}")]
    SeatNotFound { flight_id: Uuid, seat_id: Uuid },

    #[error("inventory already materialized for flight {0}")]
    InventoryExists(Uuid),

    #[error("flight already registered: {0}")]
    FlightExists(Uuid),

    #[error("no {cabin:?} cabin on flight {flight_id}")]
    NoSuchClass { flight_id: Uuid, cabin: CabinClass },

    #[error("version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },
}
