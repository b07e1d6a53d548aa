use crate::error::StoreError;
use crate::store::TicketStore;
use serde::{Deserialize, Serialize};
use skyfare_catalog::CabinClass;
use uuid::Uuid;

/// What the search surface renders per seat-class card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Availability {
    pub seats_free: u32,
    pub reference_price_nuc: i32,
}

impl TicketStore {
    /// Count of currently sellable tickets for a (flight, class) pair plus
    /// the class price recorded at inventory creation.
    ///
    /// Served from the incrementally maintained counter, never a row scan,
    /// and without taking any lock a writer would wait on. The count may be
    /// momentarily stale under concurrent writes but never reflects the
    /// intermediate state of a reservation that was rolled back.
    pub fn availability(
        &self,
        flight_id: Uuid,
        cabin: CabinClass,
    ) -> Result<Availability, StoreError> {
        if !self.has_inventory(flight_id) {
            return Err(StoreError::FlightNotFound(flight_id));
        }
        let reference_price_nuc = self
            .class_price(flight_id, cabin)
            .ok_or(StoreError::NoSuchClass { flight_id, cabin })?;
        let seats_free = self.free_count(flight_id, cabin).unwrap_or(0).max(0) as u32;
        Ok(Availability {
            seats_free,
            reference_price_nuc,
        })
    }
}
