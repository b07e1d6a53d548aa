use crate::error::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfare_catalog::{Flight, FlightStatus};
use skyfare_inventory::{DelayRecord, FlightStore, StoreError, TicketStatus, TicketStore};
use std::sync::Arc;
use uuid::Uuid;

/// What a schedule change did: the flight after the edit and how many
/// booked tickets were marked delayed in this pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeOutcome {
    pub flight: Flight,
    pub affected: u32,
}

/// Propagates a flight schedule change onto the flight's booked tickets.
///
/// The cascade is not one cross-ticket transaction: each transition is an
/// independent compare-and-swap, racing reservations on the same flight
/// without blocking them. A ticket booked mid-scan is simply missed this
/// pass; the flight row already carries the new schedule, and the next
/// cascade trigger picks the straggler up.
pub struct DelayCascadeProcessor {
    tickets: Arc<TicketStore>,
    flights: Arc<FlightStore>,
}

impl DelayCascadeProcessor {
    pub fn new(tickets: Arc<TicketStore>, flights: Arc<FlightStore>) -> Self {
        Self { tickets, flights }
    }

    pub fn apply_schedule(
        &self,
        flight_id: Uuid,
        new_departure: DateTime<Utc>,
        new_arrival: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<CascadeOutcome, BookingError> {
        Flight::validate_schedule(new_departure, new_arrival)?;
        let current = self
            .flights
            .get(flight_id)
            .map_err(|_| BookingError::FlightNotFound(flight_id))?;

        let departure_moved = current.departure_time != new_departure;
        let delay_minutes = (new_departure - current.departure_time).num_minutes();

        // Write the schedule before touching tickets, so anything booked
        // from here on is booked against the new time.
        let flight = self.flights.update(flight_id, |f| {
            f.departure_time = new_departure;
            f.arrival_time = new_arrival;
        })?;

        if !departure_moved {
            return Ok(CascadeOutcome { flight, affected: 0 });
        }

        let mut affected = 0u32;
        for ticket in self.tickets.list_by_flight(flight_id) {
            if !matches!(
                ticket.status,
                TicketStatus::Booked | TicketStatus::Delayed
            ) {
                continue;
            }
            if self.mark_delayed(ticket.id, ticket.version) {
                affected += 1;
            }
        }

        self.flights.record_delay(DelayRecord {
            flight_id,
            delay_minutes,
            reason,
            recorded_at: Utc::now(),
        });

        // Only an open flight flips to DELAYED; closed or cancelled
        // flights keep their lifecycle status.
        let flight = if affected > 0 && flight.status == FlightStatus::Open {
            self.flights
                .update(flight_id, |f| f.update_status(FlightStatus::Delayed))?
        } else {
            self.flights.get(flight_id)?
        };

        tracing::info!(
            %flight_id,
            designator = %flight.designator,
            delay_minutes,
            affected,
            "delay cascade applied"
        );
        Ok(CascadeOutcome { flight, affected })
    }

    /// One optimistic transition to DELAYED. A lost swap is retried once
    /// against fresh state; if the row is still contended it is left for
    /// the next cascade trigger rather than surfaced as an error.
    fn mark_delayed(&self, ticket_id: Uuid, scanned_version: u64) -> bool {
        let mut expected = scanned_version;
        for _ in 0..2 {
            let swap = self
                .tickets
                .compare_and_swap(ticket_id, expected, |row| {
                    row.status = TicketStatus::Delayed;
                });
            match swap {
                Ok(_) => return true,
                Err(StoreError::VersionConflict { .. }) => {
                    let Ok(fresh) = self.tickets.get(ticket_id) else {
                        return false;
                    };
                    if !matches!(
                        fresh.status,
                        TicketStatus::Booked | TicketStatus::Delayed
                    ) {
                        // Cancelled or released underneath us; not ours to delay
                        return false;
                    }
                    expected = fresh.version;
                }
                Err(_) => return false,
            }
        }
        tracing::warn!(%ticket_id, "ticket still contended, leaving it for the next cascade");
        false
    }
}
