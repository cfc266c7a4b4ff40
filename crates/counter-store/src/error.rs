use thiserror::Error;

/// Errors that can occur when talking to the counter store.
#[derive(Debug, Error)]
pub enum CounterStoreError {
    /// The store could not be reached or refused the call.
    #[error("Counter store unavailable: {0}")]
    Unavailable(String),

    /// The Redis client reported a connection, protocol or script failure.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type for counter store operations.
pub type Result<T> = std::result::Result<T, CounterStoreError>;
