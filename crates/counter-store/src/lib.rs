pub mod error;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use error::{CounterStoreError, Result};
pub use memory::InMemoryCounterStore;
pub use redis_store::RedisCounterStore;
pub use store::{CounterRead, CounterStore, CounterStoreExt, MAX_COUNTER, parse_counter};
