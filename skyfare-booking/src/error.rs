use skyfare_catalog::{FlightError, FlightStatus};
use skyfare_inventory::{StoreError, TicketStatus};
use uuid::Uuid;

/// Failures surfaced to external callers.
///
/// `StoreError::VersionConflict` never appears here: the coordinator and
/// the cascade consume it internally (retry, rollback) or convert it to
/// [`BookingError::ReservationConflict`] once retries are exhausted.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: usize, available: usize },

    #[error("reservation conflict: optimistic retries exhausted after {attempts} attempts")]
    ReservationConflict { attempts: u32 },

    #[error("caller is not the ticket owner")]
    NotOwner,

    #[error("ticket is not in a cancellable state: {status:?}")]
    InvalidState { status: TicketStatus },

    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("flight is not open for booking: {status:?}")]
    FlightNotBookable { status: FlightStatus },

    #[error("a booking group needs at least one passenger")]
    EmptyGroup,

    #[error(transparent)]
    Schedule(#[from] FlightError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
