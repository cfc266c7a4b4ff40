//! Shared application state.

use std::sync::Arc;

use counter_store::CounterStore;
use domain::{Catalog, ReservationEngine, ReservationStrategy};

/// Shared application state accessible from all handlers.
pub struct AppState<S: CounterStore> {
    pub engine: ReservationEngine<S>,
}

impl<S: CounterStore> AppState<S> {
    /// Builds the state around a catalog, a counter store and a strategy.
    pub fn new(catalog: Catalog, store: S, strategy: ReservationStrategy) -> Arc<Self> {
        let engine = ReservationEngine::new(Arc::new(catalog), store).with_strategy(strategy);
        Arc::new(Self { engine })
    }
}
