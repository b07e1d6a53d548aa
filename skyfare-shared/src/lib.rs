pub mod events;
pub mod passenger;
pub mod pii;

pub use events::EngineEvent;
pub use passenger::{Gender, Passenger};
pub use pii::Masked;
