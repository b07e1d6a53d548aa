use crate::error::BookingError;
use crate::models::BookingGroup;
use chrono::Utc;
use skyfare_catalog::CabinClass;
use skyfare_inventory::{FlightStore, StoreError, Ticket, TicketStatus, TicketStore};
use skyfare_shared::Passenger;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const RELEASE_RETRIES: u32 = 4;

/// Atomically converts N free tickets of a class into N booked tickets for
/// a named group of passengers, or fails the whole group.
///
/// No lock is held across the group: each ticket is claimed with an
/// individual compare-and-swap, and any claim lost to a concurrent writer
/// rolls the whole attempt back before retrying against a fresh snapshot.
pub struct ReservationCoordinator {
    tickets: Arc<TicketStore>,
    flights: Arc<FlightStore>,
    max_attempts: u32,
}

impl ReservationCoordinator {
    pub fn new(tickets: Arc<TicketStore>, flights: Arc<FlightStore>) -> Self {
        Self {
            tickets,
            flights,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Reserve one seat per passenger, all-or-nothing.
    ///
    /// Seats are picked in aircraft layout order so the same store state
    /// always yields the same assignment. Passengers keep their input
    /// order: passenger i gets the i-th selected seat.
    pub fn reserve(
        &self,
        flight_id: Uuid,
        cabin: CabinClass,
        passengers: Vec<Passenger>,
        owner: &str,
    ) -> Result<BookingGroup, BookingError> {
        if passengers.is_empty() {
            return Err(BookingError::EmptyGroup);
        }
        let flight = self
            .flights
            .get(flight_id)
            .map_err(|_| BookingError::FlightNotFound(flight_id))?;
        if !flight.is_bookable() {
            return Err(BookingError::FlightNotBookable {
                status: flight.status,
            });
        }

        let requested = passengers.len();
        for attempt in 1..=self.max_attempts {
            let free = self.tickets.free_tickets(flight_id, cabin);
            if free.len() < requested {
                return Err(BookingError::InsufficientInventory {
                    requested,
                    available: free.len(),
                });
            }

            match self.claim_group(&free[..requested], &passengers, owner) {
                Ok(claimed) => {
                    let group =
                        BookingGroup::new(flight_id, owner.to_string(), Utc::now(), claimed);
                    tracing::info!(
                        %flight_id,
                        owner,
                        cabin = ?cabin,
                        seats = ?group.seat_numbers(),
                        attempt,
                        "booking group reserved"
                    );
                    return Ok(group);
                }
                Err(ClaimAbort::Conflict) => {
                    tracing::warn!(
                        %flight_id,
                        owner,
                        attempt,
                        "reservation attempt lost a seat to a concurrent writer, retrying"
                    );
                }
                Err(ClaimAbort::Fatal(e)) => return Err(e.into()),
            }
        }

        Err(BookingError::ReservationConflict {
            attempts: self.max_attempts,
        })
    }

    /// Claim every selected ticket or none. On the first lost swap, every
    /// ticket already claimed in this attempt is released again.
    fn claim_group(
        &self,
        picks: &[Ticket],
        passengers: &[Passenger],
        owner: &str,
    ) -> Result<Vec<Ticket>, ClaimAbort> {
        let mut claimed: Vec<Ticket> = Vec::with_capacity(picks.len());
        for (pick, passenger) in picks.iter().zip(passengers) {
            let swap = self.tickets.compare_and_swap(pick.id, pick.version, |row| {
                row.status = TicketStatus::Booked;
                row.owner = Some(owner.to_string());
                row.passenger = Some(passenger.clone());
            });
            match swap {
                Ok(row) => claimed.push(row),
                Err(StoreError::VersionConflict { .. }) => {
                    self.rollback(&claimed);
                    return Err(ClaimAbort::Conflict);
                }
                Err(e) => {
                    self.rollback(&claimed);
                    return Err(ClaimAbort::Fatal(e));
                }
            }
        }
        Ok(claimed)
    }

    fn rollback(&self, claimed: &[Ticket]) {
        for row in claimed {
            self.release(row.id);
        }
    }

    /// Compensating swap back to FREE. A delay cascade may have bumped the
    /// row between our claim and the rollback (BOOKED -> DELAYED), so this
    /// re-reads and retries instead of trusting the version we claimed at.
    fn release(&self, ticket_id: Uuid) {
        for _ in 0..RELEASE_RETRIES {
            let Ok(current) = self.tickets.get(ticket_id) else {
                return;
            };
            if !matches!(
                current.status,
                TicketStatus::Booked | TicketStatus::Delayed
            ) {
                return;
            }
            let swap = self
                .tickets
                .compare_and_swap(ticket_id, current.version, |row| {
                    row.status = TicketStatus::Free;
                    row.owner = None;
                    row.passenger = None;
                });
            match swap {
                Ok(_) => return,
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(_) => return,
            }
        }
        tracing::error!(%ticket_id, "could not release ticket while rolling back a reservation");
    }
}

enum ClaimAbort {
    Conflict,
    Fatal(StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use skyfare_catalog::{Aircraft, ClassPricing, Flight, FlightStatus};
    use skyfare_shared::Gender;

    fn passenger(name: &str) -> Passenger {
        Passenger::new(
            name,
            format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            "+84 900 111 222",
            NaiveDate::from_ymd_opt(1990, 6, 1).unwrap(),
            Gender::Other,
            "1 Trang Tien, Hanoi",
        )
    }

    fn engine(economy_seats: usize) -> (Arc<TicketStore>, Arc<FlightStore>, Uuid) {
        let mut aircraft = Aircraft::new("A320", "Airbus");
        for i in 0..economy_seats {
            aircraft.add_seat(format!("{}A", 10 + i), CabinClass::Economy, true);
        }

        let departure = Utc::now() + Duration::days(5);
        let flight = Flight::new(
            "SF204",
            "Hanoi",
            "HAN",
            "Da Nang",
            "DAD",
            departure,
            departure + Duration::hours(2),
            "A4",
            aircraft.id,
        )
        .unwrap();
        let flight_id = flight.id;

        let tickets = Arc::new(TicketStore::new());
        let flights = Arc::new(FlightStore::new());
        tickets
            .create_inventory(&flight, &aircraft, &ClassPricing::default())
            .unwrap();
        flights.insert(flight).unwrap();
        (tickets, flights, flight_id)
    }

    #[test]
    fn test_reserve_assigns_passengers_in_order() {
        let (tickets, flights, flight_id) = engine(5);
        let coordinator = ReservationCoordinator::new(tickets.clone(), flights);

        let group = coordinator
            .reserve(
                flight_id,
                CabinClass::Economy,
                vec![passenger("An Pham"), passenger("Binh Le")],
                "cust-a",
            )
            .unwrap();

        assert_eq!(group.size(), 2);
        assert_eq!(group.seat_numbers(), vec!["10A", "11A"]);
        assert_eq!(group.tickets[0].passenger.as_ref().unwrap().full_name, "An Pham");
        assert_eq!(group.tickets[1].passenger.as_ref().unwrap().full_name, "Binh Le");
        assert!(group.tickets.iter().all(|t| t.status == TicketStatus::Booked
            && t.is_owned_by("cust-a")));
        assert_eq!(group.total_price_nuc, 200);

        let avail = tickets.availability(flight_id, CabinClass::Economy).unwrap();
        assert_eq!(avail.seats_free, 3);
    }

    #[test]
    fn test_insufficient_inventory_is_all_or_nothing() {
        let (tickets, flights, flight_id) = engine(2);
        let coordinator = ReservationCoordinator::new(tickets.clone(), flights);

        let result = coordinator.reserve(
            flight_id,
            CabinClass::Economy,
            vec![passenger("P One"), passenger("P Two"), passenger("P Three")],
            "cust-a",
        );
        assert!(matches!(
            result,
            Err(BookingError::InsufficientInventory {
                requested: 3,
                available: 2
            })
        ));

        // Nothing leaked: both seats still free
        assert_eq!(
            tickets
                .availability(flight_id, CabinClass::Economy)
                .unwrap()
                .seats_free,
            2
        );
        assert!(tickets
            .list_by_flight(flight_id)
            .iter()
            .all(|t| t.status == TicketStatus::Free && t.version == 0));
    }

    #[test]
    fn test_empty_group_rejected() {
        let (tickets, flights, flight_id) = engine(2);
        let coordinator = ReservationCoordinator::new(tickets, flights);
        let result = coordinator.reserve(flight_id, CabinClass::Economy, vec![], "cust-a");
        assert!(matches!(result, Err(BookingError::EmptyGroup)));
    }

    #[test]
    fn test_closed_flight_refuses_bookings() {
        let (tickets, flights, flight_id) = engine(2);
        flights
            .update(flight_id, |f| f.update_status(FlightStatus::Closed))
            .unwrap();
        let coordinator = ReservationCoordinator::new(tickets, flights);

        let result = coordinator.reserve(
            flight_id,
            CabinClass::Economy,
            vec![passenger("P One")],
            "cust-a",
        );
        assert!(matches!(
            result,
            Err(BookingError::FlightNotBookable {
                status: FlightStatus::Closed
            })
        ));
    }

    #[test]
    fn test_unknown_flight() {
        let (tickets, flights, _) = engine(2);
        let coordinator = ReservationCoordinator::new(tickets, flights);
        let result = coordinator.reserve(
            Uuid::new_v4(),
            CabinClass::Economy,
            vec![passenger("P One")],
            "cust-a",
        );
        assert!(matches!(result, Err(BookingError::FlightNotFound(_))));
    }

    #[test]
    fn test_concurrent_groups_never_share_a_seat() {
        let (tickets, flights, flight_id) = engine(6);
        let coordinator = Arc::new(
            ReservationCoordinator::new(tickets.clone(), flights).with_max_attempts(32),
        );

        // 4 customers race for groups of 2 over 6 seats
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let coordinator = coordinator.clone();
                std::thread::spawn(move || {
                    coordinator.reserve(
                        flight_id,
                        CabinClass::Economy,
                        vec![passenger("P One"), passenger("P Two")],
                        &format!("cust-{i}"),
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
        // A racer reading during another group's claim-then-rollback window
        // may legitimately see too few free seats, so at most 3 win.
        assert!(winners.len() <= 3);
        for loser in results.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                loser,
                Err(BookingError::InsufficientInventory { .. })
                    | Err(BookingError::ReservationConflict { .. })
            ));
        }

        // No seat claimed twice, and the counter matches the rows
        let mut seen = std::collections::HashSet::new();
        for group in winners.iter() {
            for ticket in &group.as_ref().unwrap().tickets {
                assert!(seen.insert(ticket.id), "seat sold twice");
            }
        }
        assert_eq!(seen.len(), winners.len() * 2);
        assert_eq!(
            tickets
                .availability(flight_id, CabinClass::Economy)
                .unwrap()
                .seats_free as usize,
            6 - seen.len()
        );
        assert_eq!(
            tickets.free_tickets(flight_id, CabinClass::Economy).len(),
            6 - seen.len()
        );
    }
}
