//! Domain layer for the stock reservation service.
//!
//! This crate provides:
//! - Product and Catalog, the static list of sellable items
//! - ReservationEngine, which computes live quantities and reserves
//!   single units against a counter store

pub mod catalog;
pub mod error;
pub mod reservation;

pub use catalog::{Catalog, Product};
pub use error::{CatalogError, ReservationError};
pub use reservation::{ReservationEngine, ReservationOutcome, ReservationStrategy};
