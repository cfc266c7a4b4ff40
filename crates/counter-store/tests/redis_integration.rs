//! Redis integration tests
//!
//! These tests use a shared Redis container for efficiency. Each test works
//! on its own keys, so they may run in parallel.
//! Run with:
//!
//! ```bash
//! cargo test -p counter-store --test redis_integration
//! ```

use std::sync::Arc;

use counter_store::{CounterRead, CounterStore, CounterStoreExt, MAX_COUNTER, RedisCounterStore};
use futures_util::future::join_all;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Redis>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Redis::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(6379).await.unwrap();

            let connection_string = format!("redis://{}:{}", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_store() -> RedisCounterStore {
    let info = get_container_info().await;
    RedisCounterStore::connect(&info.connection_string)
        .await
        .unwrap()
}

#[tokio::test]
async fn get_missing_key_returns_none() {
    let store = get_test_store().await;
    assert_eq!(store.get("it.missing.1").await.unwrap(), None);
}

#[tokio::test]
async fn set_then_read_counter() {
    let store = get_test_store().await;
    store.set_counter("it.set.1", 7).await.unwrap();

    assert_eq!(store.get("it.set.1").await.unwrap().as_deref(), Some("7"));
    assert_eq!(
        store.read_counter("it.set.1").await.unwrap(),
        CounterRead::Value(7)
    );
}

#[tokio::test]
async fn decrement_seeds_missing_key_from_fallback() {
    let store = get_test_store().await;

    let remaining = store.decrement_if_positive("it.seed.1", 10).await.unwrap();

    assert_eq!(remaining, Some(9));
    assert_eq!(store.get("it.seed.1").await.unwrap().as_deref(), Some("9"));
}

#[tokio::test]
async fn decrement_at_zero_is_a_no_op() {
    let store = get_test_store().await;
    store.set_counter("it.zero.1", 0).await.unwrap();

    assert_eq!(
        store.decrement_if_positive("it.zero.1", 5).await.unwrap(),
        None
    );
    assert_eq!(store.get("it.zero.1").await.unwrap().as_deref(), Some("0"));

    assert_eq!(
        store.decrement_if_positive("it.zero.2", 0).await.unwrap(),
        None
    );
    assert_eq!(store.get("it.zero.2").await.unwrap(), None);
}

#[tokio::test]
async fn decrement_treats_malformed_value_as_fallback() {
    let store = get_test_store().await;
    store.set("it.bad.1", "not-a-number").await.unwrap();

    assert_eq!(
        store.decrement_if_positive("it.bad.1", 4).await.unwrap(),
        Some(3)
    );
}

#[tokio::test]
async fn decrement_treats_out_of_range_value_as_fallback() {
    let store = get_test_store().await;
    store.set("it.huge.1", "99999999999999999999").await.unwrap();

    assert_eq!(
        store.decrement_if_positive("it.huge.1", 4).await.unwrap(),
        Some(3)
    );
    assert_eq!(store.get("it.huge.1").await.unwrap().as_deref(), Some("3"));
    assert_eq!(
        store.read_counter("it.huge.1").await.unwrap(),
        CounterRead::Value(3)
    );
}

#[tokio::test]
async fn decrement_accepts_largest_counter() {
    let store = get_test_store().await;
    store.set_counter("it.max.1", MAX_COUNTER).await.unwrap();

    assert_eq!(
        store.decrement_if_positive("it.max.1", 4).await.unwrap(),
        Some(MAX_COUNTER - 1)
    );
    assert_eq!(
        store.read_counter("it.max.1").await.unwrap(),
        CounterRead::Value(MAX_COUNTER - 1)
    );
}

#[tokio::test]
async fn concurrent_decrements_stop_at_zero() {
    let store = get_test_store().await;

    let attempts = (0..25).map(|_| {
        let store = store.clone();
        async move { store.decrement_if_positive("it.race.1", 10).await.unwrap() }
    });
    let results = join_all(attempts).await;

    let successes = results.iter().filter(|r| r.is_some()).count();
    assert_eq!(successes, 10);
    assert_eq!(store.get("it.race.1").await.unwrap().as_deref(), Some("0"));
}
