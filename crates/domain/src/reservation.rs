//! Reservation engine computing live quantities and reserving single units.

use std::sync::Arc;

use common::ItemId;
use counter_store::{CounterRead, CounterStore, CounterStoreError, CounterStoreExt};

use crate::catalog::{Catalog, Product};
use crate::error::ReservationError;

/// How a reservation decrements the stored counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationStrategy {
    /// One conditional-decrement call executed atomically by the store.
    #[default]
    Atomic,
    /// Separate get and set calls.
    ///
    /// Concurrent reservations of the same item can both observe the same
    /// quantity and both write it minus one, losing an update. Only meant
    /// for parity testing against the legacy behavior.
    ReadThenWrite,
}

impl ReservationStrategy {
    /// Returns the configuration name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStrategy::Atomic => "atomic",
            ReservationStrategy::ReadThenWrite => "read-then-write",
        }
    }
}

impl std::fmt::Display for ReservationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReservationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(ReservationStrategy::Atomic),
            "read-then-write" | "read_then_write" => Ok(ReservationStrategy::ReadThenWrite),
            other => Err(format!("unknown reservation strategy '{other}'")),
        }
    }
}

/// Business outcome of a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// One unit was reserved; `remaining` units are left.
    Reserved { item_id: ItemId, remaining: i64 },
    /// No unit was available; nothing was written.
    OutOfStock { item_id: ItemId },
}

impl ReservationOutcome {
    /// Returns the item the outcome refers to.
    pub fn item_id(&self) -> ItemId {
        match self {
            ReservationOutcome::Reserved { item_id, .. }
            | ReservationOutcome::OutOfStock { item_id } => *item_id,
        }
    }

    /// Returns true if a unit was reserved.
    pub fn is_reserved(&self) -> bool {
        matches!(self, ReservationOutcome::Reserved { .. })
    }

    fn metric_label(&self) -> &'static str {
        match self {
            ReservationOutcome::Reserved { .. } => "reserved",
            ReservationOutcome::OutOfStock { .. } => "out_of_stock",
        }
    }
}

/// Computes available quantities and executes reservations.
///
/// The engine holds no per-item state of its own. All mutable state lives
/// in the counter store under `item.<id>` keys; a missing key means the
/// product's initial stock is still fully available.
pub struct ReservationEngine<S: CounterStore> {
    catalog: Arc<Catalog>,
    store: S,
    strategy: ReservationStrategy,
}

impl<S: CounterStore> ReservationEngine<S> {
    /// Creates an engine using the atomic reservation strategy.
    pub fn new(catalog: Arc<Catalog>, store: S) -> Self {
        Self {
            catalog,
            store,
            strategy: ReservationStrategy::default(),
        }
    }

    /// Replaces the reservation strategy.
    pub fn with_strategy(mut self, strategy: ReservationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the catalog the engine reserves against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns every catalog product.
    pub fn list_catalog(&self) -> &[Product] {
        self.catalog.products()
    }

    /// Returns the active reservation strategy.
    pub fn strategy(&self) -> ReservationStrategy {
        self.strategy
    }

    /// Returns a reference to the underlying counter store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up a catalog product.
    pub fn product(&self, item_id: ItemId) -> Result<&Product, ReservationError> {
        self.catalog
            .find_by_id(item_id)
            .ok_or(ReservationError::ProductNotFound(item_id))
    }

    /// Returns the number of units currently available for an item.
    ///
    /// Never negative. Falls back to the product's initial stock when no
    /// counter has been written or the stored value is not an integer.
    #[tracing::instrument(skip(self))]
    pub async fn available_quantity(&self, item_id: ItemId) -> Result<i64, ReservationError> {
        let (_, quantity) = self.product_with_quantity(item_id).await?;
        Ok(quantity)
    }

    /// Looks up a catalog product together with its available quantity.
    pub async fn product_with_quantity(
        &self,
        item_id: ItemId,
    ) -> Result<(&Product, i64), ReservationError> {
        let product = self.product(item_id)?;
        let quantity = self.current_quantity(product).await?;
        Ok((product, quantity))
    }

    /// Reserves one unit of an item.
    #[tracing::instrument(skip(self), fields(strategy = %self.strategy))]
    pub async fn reserve(&self, item_id: ItemId) -> Result<ReservationOutcome, ReservationError> {
        let product = self.product(item_id).inspect_err(|_| {
            metrics::counter!("reservations_total", "outcome" => "not_found").increment(1);
        })?;

        let outcome = match self.strategy {
            ReservationStrategy::Atomic => self.reserve_atomic(product).await?,
            ReservationStrategy::ReadThenWrite => self.reserve_read_then_write(product).await?,
        };

        metrics::counter!("reservations_total", "outcome" => outcome.metric_label()).increment(1);
        match outcome {
            ReservationOutcome::Reserved { remaining, .. } => {
                tracing::info!(%item_id, remaining, "reservation confirmed");
            }
            ReservationOutcome::OutOfStock { .. } => {
                tracing::info!(%item_id, "reservation rejected, out of stock");
            }
        }

        Ok(outcome)
    }

    async fn reserve_atomic(&self, product: &Product) -> Result<ReservationOutcome, ReservationError> {
        let remaining = self
            .store
            .decrement_if_positive(&product.id.counter_key(), product.initial_quantity())
            .await
            .map_err(store_failure)?;

        Ok(match remaining {
            Some(remaining) => ReservationOutcome::Reserved {
                item_id: product.id,
                remaining,
            },
            None => ReservationOutcome::OutOfStock { item_id: product.id },
        })
    }

    async fn reserve_read_then_write(
        &self,
        product: &Product,
    ) -> Result<ReservationOutcome, ReservationError> {
        let quantity = self.current_quantity(product).await?;
        if quantity <= 0 {
            return Ok(ReservationOutcome::OutOfStock { item_id: product.id });
        }

        let remaining = quantity - 1;
        self.store
            .set_counter(&product.id.counter_key(), remaining)
            .await
            .map_err(store_failure)?;

        Ok(ReservationOutcome::Reserved {
            item_id: product.id,
            remaining,
        })
    }

    async fn current_quantity(&self, product: &Product) -> Result<i64, ReservationError> {
        let key = product.id.counter_key();
        let read = self.store.read_counter(&key).await.map_err(store_failure)?;

        let quantity = match read {
            CounterRead::Value(value) => value,
            CounterRead::Missing => product.initial_quantity(),
            CounterRead::Malformed(raw) => {
                metrics::counter!("counter_malformed_total").increment(1);
                tracing::warn!(%key, %raw, "malformed counter value, using initial stock");
                product.initial_quantity()
            }
        };

        Ok(quantity.max(0))
    }
}

fn store_failure(err: CounterStoreError) -> ReservationError {
    metrics::counter!("counter_store_errors_total").increment(1);
    tracing::error!(error = %err, "counter store call failed");
    ReservationError::Store(err)
}
