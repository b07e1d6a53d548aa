use crate::error::StoreError;
use crate::ticket::{Ticket, TicketStatus};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use skyfare_catalog::{Aircraft, CabinClass, ClassPricing, Flight};
use uuid::Uuid;

/// The seat inventory table: one ticket per (flight, seat), keyed by ticket
/// id with a per-flight index in aircraft layout order.
///
/// This is the only shared mutable resource in the engine. Every write goes
/// through [`TicketStore::compare_and_swap`]; nothing else mutates a row,
/// which is what makes the optimistic-concurrency guarantees hold without a
/// coarse lock. Reads never block writers and may be momentarily stale.
pub struct TicketStore {
    tickets: DashMap<Uuid, Ticket>,
    /// Ticket ids per flight, in the order seats appear on the aircraft.
    by_flight: DashMap<Uuid, Vec<Uuid>>,
    /// Free-seat counters per (flight, class), maintained incrementally on
    /// every accepted swap so availability never rescans the table.
    free_counts: DashMap<(Uuid, CabinClass), i64>,
    /// Per-class price recorded at inventory creation. Uniform per class
    /// per flight, so a sold-out class still quotes a price.
    class_prices: DashMap<(Uuid, CabinClass), i32>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore {
    pub fn new() -> Self {
        Self {
            tickets: DashMap::new(),
            by_flight: DashMap::new(),
            free_counts: DashMap::new(),
            class_prices: DashMap::new(),
        }
    }

    /// Materialize one FREE ticket per seat template of the flight's
    /// aircraft. Called exactly once per flight, before any booking
    /// traffic; a second call is rejected.
    pub fn create_inventory(
        &self,
        flight: &Flight,
        aircraft: &Aircraft,
        pricing: &ClassPricing,
    ) -> Result<Vec<Ticket>, StoreError> {
        let ids_entry = match self.by_flight.entry(flight.id) {
            Entry::Occupied(_) => return Err(StoreError::InventoryExists(flight.id)),
            Entry::Vacant(e) => e,
        };

        let mut created = Vec::with_capacity(aircraft.seats.len());
        let mut ids = Vec::with_capacity(aircraft.seats.len());
        for seat in &aircraft.seats {
            let ticket = Ticket::new(flight.id, seat, pricing.price_for(seat.cabin));
            ids.push(ticket.id);
            self.class_prices
                .insert((flight.id, seat.cabin), ticket.price_nuc);
            *self.free_counts.entry((flight.id, seat.cabin)).or_insert(0) += 1;
            self.tickets.insert(ticket.id, ticket.clone());
            created.push(ticket);
        }
        ids_entry.insert(ids);

        tracing::info!(
            flight_id = %flight.id,
            designator = %flight.designator,
            tickets = created.len(),
            "inventory materialized"
        );
        Ok(created)
    }

    pub fn get(&self, ticket_id: Uuid) -> Result<Ticket, StoreError> {
        self.tickets
            .get(&ticket_id)
            .map(|row| row.clone())
            .ok_or(StoreError::TicketNotFound(ticket_id))
    }

    pub fn get_seat(&self, flight_id: Uuid, seat_id: Uuid) -> Result<Ticket, StoreError> {
        let ids = self
            .by_flight
            .get(&flight_id)
            .ok_or(StoreError::FlightNotFound(flight_id))?;
        ids.iter()
            .filter_map(|id| self.tickets.get(id))
            .find(|row| row.seat_id == seat_id)
            .map(|row| row.clone())
            .ok_or(StoreError::SeatNotFound { flight_id, seat_id })
    }

    /// All tickets of a flight, in aircraft layout order. Empty when the
    /// flight has no inventory.
    pub fn list_by_flight(&self, flight_id: Uuid) -> Vec<Ticket> {
        let Some(ids) = self.by_flight.get(&flight_id) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.tickets.get(id).map(|row| row.clone()))
            .collect()
    }

    /// Snapshot of the currently FREE tickets of one class, in layout
    /// order. The snapshot is immediately stale under concurrent writes;
    /// callers claim each ticket through compare-and-swap anyway.
    pub fn free_tickets(&self, flight_id: Uuid, cabin: CabinClass) -> Vec<Ticket> {
        self.list_by_flight(flight_id)
            .into_iter()
            .filter(|t| t.cabin == cabin && t.status == TicketStatus::Free)
            .collect()
    }

    pub fn has_inventory(&self, flight_id: Uuid) -> bool {
        self.by_flight.contains_key(&flight_id)
    }

    /// The single mutation primitive. Applies `mutation` under the row lock
    /// only when the caller's version matches the row, then bumps the
    /// version; otherwise rejects with [`StoreError::VersionConflict`] and
    /// the caller retries against fresh data.
    ///
    /// The free-seat counter is adjusted before the row lock is released,
    /// so a rollback (BOOKED back to FREE) is never observable as lost
    /// inventory.
    pub fn compare_and_swap(
        &self,
        ticket_id: Uuid,
        expected_version: u64,
        mutation: impl FnOnce(&mut Ticket),
    ) -> Result<Ticket, StoreError> {
        let mut row = self
            .tickets
            .get_mut(&ticket_id)
            .ok_or(StoreError::TicketNotFound(ticket_id))?;

        if row.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                found: row.version,
            });
        }

        let old_status = row.status;
        mutation(&mut row);
        row.version += 1;
        row.updated_at = Utc::now();
        debug_assert!(
            row.invariant_holds(),
            "owner/status invariant violated on ticket {}",
            row.id
        );

        let new_status = row.status;
        if old_status != new_status {
            if old_status == TicketStatus::Free {
                self.adjust_free_count(row.flight_id, row.cabin, -1);
            }
            if new_status == TicketStatus::Free {
                self.adjust_free_count(row.flight_id, row.cabin, 1);
            }
        }

        Ok(row.clone())
    }

    fn adjust_free_count(&self, flight_id: Uuid, cabin: CabinClass, delta: i64) {
        *self.free_counts.entry((flight_id, cabin)).or_insert(0) += delta;
    }

    pub(crate) fn free_count(&self, flight_id: Uuid, cabin: CabinClass) -> Option<i64> {
        self.free_counts.get(&(flight_id, cabin)).map(|c| *c)
    }

    pub(crate) fn class_price(&self, flight_id: Uuid, cabin: CabinClass) -> Option<i32> {
        self.class_prices.get(&(flight_id, cabin)).map(|p| *p)
    }
}
