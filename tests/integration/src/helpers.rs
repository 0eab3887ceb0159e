//! Test helpers for integration tests
//!
//! Provides builders for the service context, Redis connectivity checks and
//! shorthand for reading counters back out of a store.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use stats_cache::{MemoryCounterStore, RedisCounterStore, RedisPool, RedisPoolConfig};
use stats_core::{CounterStore, Snowflake, StatKind, StatScope};
use stats_service::{CommandInvocation, StatsContext};

use crate::fixtures::{FakeChat, GUILD_ID};

/// Service context wired to a fake chat server and an in-memory store
pub struct TestHarness {
    pub ctx: StatsContext,
    pub chat: Arc<FakeChat>,
    pub store: Arc<MemoryCounterStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_chat(FakeChat::new())
    }

    pub fn with_chat(chat: FakeChat) -> Self {
        let chat = Arc::new(chat);
        let store = Arc::new(MemoryCounterStore::new());
        let ctx = StatsContext::new(store.clone(), chat.clone());
        Self { ctx, chat, store }
    }

    /// Same chat server, empty store
    pub fn with_fresh_store(&self) -> Self {
        let store = Arc::new(MemoryCounterStore::new());
        let ctx = StatsContext::new(store.clone(), self.chat.clone());
        Self {
            ctx,
            chat: self.chat.clone(),
            store,
        }
    }

    /// All counters under a scope and kind
    pub async fn counts(&self, scope: StatScope, kind: StatKind) -> HashMap<String, i64> {
        read_counts(self.store.as_ref(), scope, kind).await
    }

    /// One counter, zero when absent
    pub async fn count(&self, scope: StatScope, kind: StatKind, field: &str) -> i64 {
        self.counts(scope, kind)
            .await
            .get(field)
            .copied()
            .unwrap_or_default()
    }

    /// Stored watermark of a channel, as the raw id
    pub async fn watermark(&self, channel_id: Snowflake) -> Option<i64> {
        stats_service::WatermarkTracker::new(&self.ctx)
            .get(channel_id)
            .await
            .unwrap()
            .map(Snowflake::into_inner)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Read all counters under a scope and kind, panicking on store errors
pub async fn read_counts(
    store: &dyn CounterStore,
    scope: StatScope,
    kind: StatKind,
) -> HashMap<String, i64> {
    store.hash_get_all(&scope.key(kind)).await.unwrap()
}

/// Command typed by `author_id` in `channel_id` of the fixture guild
pub fn invocation(channel_id: Snowflake, author_id: i64, content: &str) -> CommandInvocation {
    CommandInvocation {
        guild_id: GUILD_ID,
        channel_id,
        author_id: Snowflake::new(author_id),
        content: content.to_string(),
    }
}

/// Check that Redis is reachable for tests
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Redis-backed store for the configured `REDIS_URL`
pub async fn redis_store() -> Result<RedisCounterStore> {
    let url = std::env::var("REDIS_URL")?;
    let pool = RedisPool::new(RedisPoolConfig {
        url,
        max_connections: 4,
    })?;
    pool.health_check().await?;
    Ok(RedisCounterStore::new(pool))
}

/// Key name that no other test run will touch
pub fn unique_key(label: &str) -> String {
    format!(
        "stats-it:{}:{label}:{}",
        std::process::id(),
        crate::fixtures::unique_suffix()
    )
}
