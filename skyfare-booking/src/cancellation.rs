use crate::error::BookingError;
use serde::{Deserialize, Serialize};
use skyfare_inventory::{StoreError, Ticket, TicketStatus, TicketStore};
use std::sync::Arc;
use uuid::Uuid;

const CANCEL_RETRIES: u32 = 8;

/// What cancelling does to the seat.
///
/// The storefront this engine was built for treats a cancelled ticket as
/// terminal: the seat is not re-offered for sale. That loses inventory and
/// may well be an oversight rather than policy, so the alternative is a
/// first-class, tested choice instead of a silent change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationPolicy {
    /// Ticket goes to CANCELLED, owner cleared, seat stays off the market.
    Terminal,
    /// Ticket returns to FREE and the seat is sellable again.
    Release,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        CancellationPolicy::Terminal
    }
}

/// Reverses a single booked ticket, owner-checked and idempotent.
pub struct CancellationHandler {
    tickets: Arc<TicketStore>,
    policy: CancellationPolicy,
}

impl CancellationHandler {
    pub fn new(tickets: Arc<TicketStore>, policy: CancellationPolicy) -> Self {
        Self { tickets, policy }
    }

    pub fn policy(&self) -> CancellationPolicy {
        self.policy
    }

    /// Cancel a booked or delayed ticket owned by `owner`.
    ///
    /// Cancelling an already-cancelled ticket is a no-op returning the
    /// current row, so caller retries are harmless. A version bump between
    /// read and swap (a cascade marking the flight delayed) is absorbed by
    /// re-reading; the ticket stays cancellable either way.
    pub fn cancel(&self, ticket_id: Uuid, owner: &str) -> Result<Ticket, BookingError> {
        for _ in 0..CANCEL_RETRIES {
            let current = self.tickets.get(ticket_id)?;

            match current.status {
                TicketStatus::Cancelled => return Ok(current),
                TicketStatus::Booked | TicketStatus::Delayed => {}
                status => return Err(BookingError::InvalidState { status }),
            }
            if !current.is_owned_by(owner) {
                return Err(BookingError::NotOwner);
            }

            let target = match self.policy {
                CancellationPolicy::Terminal => TicketStatus::Cancelled,
                CancellationPolicy::Release => TicketStatus::Free,
            };
            let swap = self
                .tickets
                .compare_and_swap(ticket_id, current.version, |row| {
                    row.status = target;
                    row.owner = None;
                    row.passenger = None;
                });
            match swap {
                Ok(ticket) => {
                    tracing::info!(
                        %ticket_id,
                        owner,
                        policy = ?self.policy,
                        "ticket cancelled"
                    );
                    return Ok(ticket);
                }
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(BookingError::ReservationConflict {
            attempts: CANCEL_RETRIES,
        })
    }
}
