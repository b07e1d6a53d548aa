use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cabin classes sold on every flight. A closed enum shared by seat
/// templates, tickets and availability queries; status strings never
/// travel through the engine as free text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinClass {
    Economy,
    Business,
    First,
}

/// One physical seat on an aircraft type. Templates are fixed once flights
/// are scheduled against the aircraft; the sellable state per flight lives
/// on the ticket, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatTemplate {
    pub id: Uuid,
    pub number: String,
    pub cabin: CabinClass,
    pub window: bool,
    pub picture_link: Option<String>,
    pub summary: Option<String>,
}

impl SeatTemplate {
    pub fn new(number: impl Into<String>, cabin: CabinClass, window: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            cabin,
            window,
            picture_link: None,
            summary: None,
        }
    }
}

/// An aircraft type with its ordered seat map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub seats: Vec<SeatTemplate>,
    pub diagram_link: Option<String>,
    pub summary: Option<String>,
}

impl Aircraft {
    pub fn new(name: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            manufacturer: manufacturer.into(),
            seats: Vec::new(),
            diagram_link: None,
            summary: None,
        }
    }

    /// Append a seat to the map. Seat order is the order seats were laid
    /// out in, which is also the order inventory is materialized in.
    pub fn add_seat(&mut self, number: impl Into<String>, cabin: CabinClass, window: bool) {
        self.seats.push(SeatTemplate::new(number, cabin, window));
    }

    pub fn seats_in_class(&self, cabin: CabinClass) -> impl Iterator<Item = &SeatTemplate> {
        self.seats.iter().filter(move |s| s.cabin == cabin)
    }

    /// Physical capacity of one cabin class.
    pub fn capacity(&self, cabin: CabinClass) -> usize {
        self.seats_in_class(cabin).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_per_class() {
        let mut aircraft = Aircraft::new("A321neo", "Airbus");
        aircraft.add_seat("1A", CabinClass::Business, true);
        aircraft.add_seat("1C", CabinClass::Business, false);
        aircraft.add_seat("12A", CabinClass::Economy, true);
        aircraft.add_seat("12B", CabinClass::Economy, false);
        aircraft.add_seat("12C", CabinClass::Economy, false);

        assert_eq!(aircraft.capacity(CabinClass::Business), 2);
        assert_eq!(aircraft.capacity(CabinClass::Economy), 3);
        assert_eq!(aircraft.capacity(CabinClass::First), 0);
    }
}
