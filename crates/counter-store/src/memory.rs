use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CounterStoreError, Result, store::CounterStore, store::parse_counter};

/// In-memory counter store for tests and local runs.
///
/// This implementation keeps every value in a map behind a single lock and
/// provides the same interface as the Redis implementation. It can be told
/// to fail every call to exercise store outage handling.
#[derive(Clone, Default)]
pub struct InMemoryCounterStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryCounterStore {
    /// Creates a new empty in-memory counter store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `CounterStoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns true if no key has been written.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CounterStoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn decrement_if_positive(&self, key: &str, fallback: i64) -> Result<Option<i64>> {
        self.check_available()?;

        // The write lock is held across read and write
        let mut values = self.values.write().await;
        let current = values
            .get(key)
            .and_then(|raw| parse_counter(raw))
            .unwrap_or(fallback);

        if current <= 0 {
            return Ok(None);
        }

        let remaining = current - 1;
        values.insert(key.to_string(), remaining.to_string());
        Ok(Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CounterRead, CounterStoreExt};

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.get("item.1").await.unwrap(), None);
        assert_eq!(
            store.read_counter("item.1").await.unwrap(),
            CounterRead::Missing
        );
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = InMemoryCounterStore::new();
        store.set_counter("item.1", 3).await.unwrap();
        assert_eq!(store.get("item.1").await.unwrap().as_deref(), Some("3"));
        assert_eq!(
            store.read_counter("item.1").await.unwrap(),
            CounterRead::Value(3)
        );
    }

    #[tokio::test]
    async fn read_counter_flags_malformed_values() {
        let store = InMemoryCounterStore::new();
        store.set("item.1", "lots").await.unwrap();
        assert_eq!(
            store.read_counter("item.1").await.unwrap(),
            CounterRead::Malformed("lots".to_string())
        );
    }

    #[tokio::test]
    async fn decrement_seeds_from_fallback() {
        let store = InMemoryCounterStore::new();
        let remaining = store.decrement_if_positive("item.2", 10).await.unwrap();
        assert_eq!(remaining, Some(9));
        assert_eq!(store.get("item.2").await.unwrap().as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn decrement_prefers_stored_value() {
        let store = InMemoryCounterStore::new();
        store.set_counter("item.2", 1).await.unwrap();
        assert_eq!(
            store.decrement_if_positive("item.2", 10).await.unwrap(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn decrement_at_zero_writes_nothing() {
        let store = InMemoryCounterStore::new();
        store.set_counter("item.3", 0).await.unwrap();

        assert_eq!(store.decrement_if_positive("item.3", 2).await.unwrap(), None);
        assert_eq!(store.get("item.3").await.unwrap().as_deref(), Some("0"));

        // Missing key with zero fallback stays missing
        assert_eq!(store.decrement_if_positive("item.4", 0).await.unwrap(), None);
        assert!(store.get("item.4").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn decrement_treats_malformed_as_fallback() {
        let store = InMemoryCounterStore::new();
        store.set("item.1", "garbage").await.unwrap();
        assert_eq!(
            store.decrement_if_positive("item.1", 4).await.unwrap(),
            Some(3)
        );
    }

    #[tokio::test]
    async fn decrement_treats_out_of_range_value_as_fallback() {
        let store = InMemoryCounterStore::new();
        store.set("item.1", "99999999999999999999").await.unwrap();

        assert_eq!(
            store.decrement_if_positive("item.1", 4).await.unwrap(),
            Some(3)
        );
        assert_eq!(store.get("item.1").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryCounterStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.get("item.1").await,
            Err(CounterStoreError::Unavailable(_))
        ));
        assert!(store.set("item.1", "1").await.is_err());
        assert!(store.decrement_if_positive("item.1", 1).await.is_err());

        store.set_unavailable(false);
        assert!(store.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_decrements_never_overshoot() {
        let store = InMemoryCounterStore::new();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.decrement_if_positive("item.9", 20).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                successes += 1;
            }
        }

        assert_eq!(successes, 20);
        assert_eq!(store.get("item.9").await.unwrap().as_deref(), Some("0"));
    }
}
