pub mod aircraft;
pub mod flight;
pub mod pricing;

pub use aircraft::{Aircraft, CabinClass, SeatTemplate};
pub use flight::{Flight, FlightError, FlightStatus};
pub use pricing::ClassPricing;
