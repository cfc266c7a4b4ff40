use std::sync::LazyLock;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::{Result, store::CounterStore, store::MAX_COUNTER};

/// Conditional decrement executed server-side so that the read and the
/// write cannot interleave with another client's.
///
/// KEYS[1] is the counter key, ARGV[1] the fallback used when the key is
/// missing or does not hold a base-10 integer, ARGV[2] the largest accepted
/// magnitude (values beyond it count as malformed, as in `parse_counter`).
/// Returns the new value, or nil when nothing was written.
static DECREMENT_SCRIPT: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r#"
        local current = tonumber(ARGV[1])
        local raw = redis.call("GET", KEYS[1])
        if raw and string.match(raw, "^%s*[+-]?%d+%s*$") then
            local stored = tonumber(raw)
            if math.abs(stored) <= tonumber(ARGV[2]) then
                current = stored
            end
        end
        if current <= 0 then
            return nil
        end
        redis.call("SET", KEYS[1], current - 1)
        return current - 1
        "#,
    )
});

/// Redis-backed counter store implementation.
#[derive(Clone)]
pub struct RedisCounterStore {
    conn: MultiplexedConnection,
}

impl RedisCounterStore {
    /// Opens a multiplexed connection to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::info!("connected to Redis counter store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn decrement_if_positive(&self, key: &str, fallback: i64) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let remaining: Option<i64> = DECREMENT_SCRIPT
            .key(key)
            .arg(fallback)
            .arg(MAX_COUNTER)
            .invoke_async(&mut conn)
            .await?;
        Ok(remaining)
    }
}
