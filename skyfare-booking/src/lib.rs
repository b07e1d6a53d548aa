pub mod cancellation;
pub mod disruption;
pub mod error;
pub mod models;
pub mod reservation;

pub use cancellation::{CancellationHandler, CancellationPolicy};
pub use disruption::{CascadeOutcome, DelayCascadeProcessor};
pub use error::BookingError;
pub use models::BookingGroup;
pub use reservation::ReservationCoordinator;
