use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flight lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Open,
    Closed,
    Cancelled,
    Delayed,
}

/// A scheduled flight flying one aircraft type on one route.
///
/// Admin edits mutate the schedule; a departure change is the trigger for
/// the delay cascade over the flight's booked tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub designator: String,
    pub departure_city: String,
    pub departure_code: String,
    pub arrival_city: String,
    pub arrival_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub gate: String,
    pub aircraft_id: Uuid,
    pub status: FlightStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flight {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        designator: impl Into<String>,
        departure_city: impl Into<String>,
        departure_code: impl Into<String>,
        arrival_city: impl Into<String>,
        arrival_code: impl Into<String>,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        gate: impl Into<String>,
        aircraft_id: Uuid,
    ) -> Result<Self, FlightError> {
        Self::validate_schedule(departure_time, arrival_time)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            designator: designator.into(),
            departure_city: departure_city.into(),
            departure_code: departure_code.into(),
            arrival_city: arrival_city.into(),
            arrival_code: arrival_code.into(),
            departure_time,
            arrival_time,
            gate: gate.into(),
            aircraft_id,
            status: FlightStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn validate_schedule(
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    ) -> Result<(), FlightError> {
        if arrival <= departure {
            return Err(FlightError::InvalidSchedule { departure, arrival });
        }
        Ok(())
    }

    /// Apply a new schedule. Returns whether the departure actually moved,
    /// which is what decides if the delay cascade has anything to do.
    pub fn reschedule(
        &mut self,
        new_departure: DateTime<Utc>,
        new_arrival: DateTime<Utc>,
    ) -> Result<bool, FlightError> {
        Self::validate_schedule(new_departure, new_arrival)?;
        let departure_moved = self.departure_time != new_departure;
        self.departure_time = new_departure;
        self.arrival_time = new_arrival;
        self.updated_at = Utc::now();
        Ok(departure_moved)
    }

    /// Whether tickets can still be reserved. A delayed flight keeps
    /// selling; closed and cancelled flights do not.
    pub fn is_bookable(&self) -> bool {
        matches!(self.status, FlightStatus::Open | FlightStatus::Delayed)
    }

    pub fn update_status(&mut self, status: FlightStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlightError {
    #[error("arrival {arrival} is not after departure {departure}")]
    InvalidSchedule {
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_flight() -> Flight {
        let departure = Utc::now() + Duration::days(7);
        Flight::new(
            "SF204",
            "Hanoi",
            "HAN",
            "Da Nang",
            "DAD",
            departure,
            departure + Duration::hours(2),
            "A4",
            Uuid::new_v4(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_arrival_before_departure() {
        let departure = Utc::now();
        let result = Flight::new(
            "SF204",
            "Hanoi",
            "HAN",
            "Da Nang",
            "DAD",
            departure,
            departure - Duration::hours(1),
            "A4",
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(FlightError::InvalidSchedule { .. })));
    }

    #[test]
    fn test_reschedule_reports_departure_moved() {
        let mut flight = test_flight();
        let arrival = flight.arrival_time + Duration::minutes(30);

        // Arrival-only edit does not count as a departure move
        let moved = flight.reschedule(flight.departure_time, arrival).unwrap();
        assert!(!moved);

        let moved = flight
            .reschedule(flight.departure_time + Duration::minutes(45), arrival)
            .unwrap();
        assert!(moved);
    }

    #[test]
    fn test_bookable_statuses() {
        let mut flight = test_flight();
        assert!(flight.is_bookable());
        flight.update_status(FlightStatus::Delayed);
        assert!(flight.is_bookable());
        flight.update_status(FlightStatus::Closed);
        assert!(!flight.is_bookable());
        flight.update_status(FlightStatus::Cancelled);
        assert!(!flight.is_bookable());
    }
}
