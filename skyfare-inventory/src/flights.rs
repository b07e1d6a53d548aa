use crate::error::StoreError;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use skyfare_catalog::{Aircraft, Flight};
use uuid::Uuid;

/// One admin schedule change that actually moved a departure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayRecord {
    pub flight_id: Uuid,
    /// Signed shift from the previous departure. Negative when the
    /// flight was moved earlier.
    pub delay_minutes: i64,
    pub reason: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// The flight table plus the per-flight delay history.
///
/// Flights carry no version counter: the ticket compare-and-swap is the
/// engine's serialization point, and flight rows are written by a single
/// admin edit at a time in practice.
pub struct FlightStore {
    flights: DashMap<Uuid, Flight>,
    delays: DashMap<Uuid, Vec<DelayRecord>>,
}

impl Default for FlightStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightStore {
    pub fn new() -> Self {
        Self {
            flights: DashMap::new(),
            delays: DashMap::new(),
        }
    }

    pub fn insert(&self, flight: Flight) -> Result<(), StoreError> {
        match self.flights.entry(flight.id) {
            Entry::Occupied(_) => Err(StoreError::FlightExists(flight.id)),
            Entry::Vacant(e) => {
                e.insert(flight);
                Ok(())
            }
        }
    }

    pub fn get(&self, flight_id: Uuid) -> Result<Flight, StoreError> {
        self.flights
            .get(&flight_id)
            .map(|row| row.clone())
            .ok_or(StoreError::FlightNotFound(flight_id))
    }

    /// All flights, soonest departure first.
    pub fn list(&self) -> Vec<Flight> {
        let mut flights: Vec<Flight> = self.flights.iter().map(|row| row.clone()).collect();
        flights.sort_by_key(|f| f.departure_time);
        flights
    }

    pub fn update(
        &self,
        flight_id: Uuid,
        mutation: impl FnOnce(&mut Flight),
    ) -> Result<Flight, StoreError> {
        let mut row = self
            .flights
            .get_mut(&flight_id)
            .ok_or(StoreError::FlightNotFound(flight_id))?;
        mutation(&mut row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    pub fn record_delay(&self, record: DelayRecord) {
        self.delays.entry(record.flight_id).or_default().push(record);
    }

    pub fn delay_history(&self, flight_id: Uuid) -> Vec<DelayRecord> {
        self.delays
            .get(&flight_id)
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

/// Read-only reference of aircraft types and their seat maps.
pub struct AircraftStore {
    aircraft: DashMap<Uuid, Aircraft>,
}

impl Default for AircraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AircraftStore {
    pub fn new() -> Self {
        Self {
            aircraft: DashMap::new(),
        }
    }

    pub fn insert(&self, aircraft: Aircraft) {
        self.aircraft.insert(aircraft.id, aircraft);
    }

    pub fn get(&self, aircraft_id: Uuid) -> Option<Aircraft> {
        self.aircraft.get(&aircraft_id).map(|row| row.clone())
    }

    pub fn list(&self) -> Vec<Aircraft> {
        self.aircraft.iter().map(|row| row.clone()).collect()
    }
}
