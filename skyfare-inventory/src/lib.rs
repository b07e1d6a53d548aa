pub mod availability;
pub mod error;
pub mod flights;
pub mod store;
pub mod ticket;

pub use availability::Availability;
pub use error::StoreError;
pub use flights::{AircraftStore, DelayRecord, FlightStore};
pub use store::TicketStore;
pub use ticket::{Ticket, TicketStatus};
