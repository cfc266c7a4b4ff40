use async_trait::async_trait;

use crate::Result;

/// Core trait for reservation counter stores.
///
/// A counter store is a plain key-value service holding base-10 textual
/// integers. Only single-key operations are offered; the one multi-step
/// operation, [`CounterStore::decrement_if_positive`], must be atomic with
/// respect to every other call on the same key.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Reads the raw value stored under `key`.
    ///
    /// Returns None if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Atomically decrements the counter under `key` if it is positive.
    ///
    /// A missing or malformed value is read as `fallback`. When the
    /// resulting value is greater than zero, `value - 1` is written and
    /// returned. Otherwise nothing is written and None is returned.
    async fn decrement_if_positive(&self, key: &str, fallback: i64) -> Result<Option<i64>>;
}

/// A counter value as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterRead {
    /// No value has been written under the key.
    Missing,
    /// A well-formed integer value.
    Value(i64),
    /// A value that is not a base-10 integer.
    Malformed(String),
}

/// Largest counter magnitude accepted as well-formed.
///
/// Redis scripts see numbers as doubles and print them with 14 significant
/// digits, so every store uses this bound to agree on malformed values.
pub const MAX_COUNTER: i64 = 99_999_999_999_999;

/// Parses a stored counter value.
///
/// Surrounding whitespace and a leading sign are accepted; anything else
/// that is not a base-10 integer within `MAX_COUNTER` yields None.
pub fn parse_counter(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|value| value.abs() <= MAX_COUNTER)
}

/// Extension trait providing convenience methods for counter stores.
#[async_trait]
pub trait CounterStoreExt: CounterStore {
    /// Reads and classifies the counter under `key`.
    async fn read_counter(&self, key: &str) -> Result<CounterRead> {
        Ok(match self.get(key).await? {
            None => CounterRead::Missing,
            Some(raw) => match parse_counter(&raw) {
                Some(value) => CounterRead::Value(value),
                None => CounterRead::Malformed(raw),
            },
        })
    }

    /// Writes an integer counter value under `key`.
    async fn set_counter(&self, key: &str, value: i64) -> Result<()> {
        self.set(key, &value.to_string()).await
    }
}

// Blanket implementation for all CounterStore implementations
impl<T: CounterStore + ?Sized> CounterStoreExt for T {}
