//! Shared types for the stock reservation service.

pub mod types;

pub use types::{COUNTER_KEY_PREFIX, ItemId};
