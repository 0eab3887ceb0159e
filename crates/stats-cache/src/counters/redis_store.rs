//! Redis-backed counter store.
//!
//! Counters are Redis hashes (`HINCRBY` / `HGETALL`), watermarks live in the
//! `most_recent` hash, and the startup record is a plain string key.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use stats_core::{CounterStore, PortResult};

use crate::pool::RedisPool;

/// Counter store backed by a Redis pool
#[derive(Clone, Debug)]
pub struct RedisCounterStore {
    pool: RedisPool,
}

impl RedisCounterStore {
    /// Create a new Redis counter store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool
    #[must_use]
    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn hash_increment(&self, key: &str, field: &str, amount: i64) -> PortResult<i64> {
        let mut conn = self.pool.get().await?;
        let value: i64 = conn
            .hincr(key, field, amount)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;

        tracing::trace!(key, field, amount, value, "Counter incremented");
        Ok(value)
    }

    async fn hash_get_all(&self, key: &str) -> PortResult<HashMap<String, i64>> {
        let mut conn = self.pool.get().await?;
        let values: HashMap<String, i64> = conn
            .hgetall(key)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        Ok(values)
    }

    async fn hash_get(&self, key: &str, field: &str) -> PortResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn
            .hget(key, field)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        Ok(value)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> PortResult<()> {
        let mut conn = self.pool.get().await?;
        conn.hset::<_, _, _, ()>(key, field, value)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut conn = self.pool.get().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        Ok(())
    }

    async fn snapshot(&self) -> PortResult<()> {
        let mut conn = self.pool.get().await?;
        redis::cmd("SAVE")
            .query_async::<()>(&mut conn)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;

        tracing::info!("Redis snapshot saved to disk");
        Ok(())
    }

    async fn clear_all(&self) -> PortResult<()> {
        let mut conn = self.pool.get().await?;
        // Only the logical database selected by the URL is cleared
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;

        tracing::warn!("Redis database flushed");
        Ok(())
    }
}
