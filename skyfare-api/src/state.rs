use crate::app_config::BookingRules;
use skyfare_booking::{CancellationHandler, DelayCascadeProcessor, ReservationCoordinator};
use skyfare_catalog::ClassPricing;
use skyfare_inventory::{AircraftStore, FlightStore, TicketStore};
use skyfare_shared::EngineEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<TicketStore>,
    pub flights: Arc<FlightStore>,
    pub aircraft: Arc<AircraftStore>,
    pub coordinator: Arc<ReservationCoordinator>,
    pub cancellations: Arc<CancellationHandler>,
    pub cascade: Arc<DelayCascadeProcessor>,
    pub pricing: ClassPricing,
    pub events_tx: broadcast::Sender<EngineEvent>,
}

impl AppState {
    pub fn new(rules: &BookingRules, pricing: ClassPricing) -> Self {
        let tickets = Arc::new(TicketStore::new());
        let flights = Arc::new(FlightStore::new());
        let aircraft = Arc::new(AircraftStore::new());
        let coordinator = Arc::new(
            ReservationCoordinator::new(tickets.clone(), flights.clone())
                .with_max_attempts(rules.max_reserve_attempts),
        );
        let cancellations = Arc::new(CancellationHandler::new(
            tickets.clone(),
            rules.cancellation_policy,
        ));
        let cascade = Arc::new(DelayCascadeProcessor::new(tickets.clone(), flights.clone()));
        let (events_tx, _) = broadcast::channel(100);

        Self {
            tickets,
            flights,
            aircraft,
            coordinator,
            cancellations,
            cascade,
            pricing,
            events_tx,
        }
    }
}
