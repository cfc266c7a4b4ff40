//! Domain error types.

use common::ItemId;
use counter_store::CounterStoreError;
use thiserror::Error;

/// Errors that can occur during reservation operations.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// No catalog product has the requested id.
    #[error("Product not found: {0}")]
    ProductNotFound(ItemId),

    /// The counter store failed on read or write.
    #[error("Counter store error: {0}")]
    Store(#[from] CounterStoreError),
}

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product ids must be positive.
    #[error("Invalid product id {0}: ids must be positive")]
    InvalidId(ItemId),

    /// Two products share an id.
    #[error("Duplicate product id {0}")]
    DuplicateId(ItemId),

    /// The catalog file could not be read.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not valid JSON for a product list.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
