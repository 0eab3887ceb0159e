//! # stats-cache
//!
//! Counter storage for the stats bot.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Redis Counter Store**: `CounterStore` over Redis hashes and strings
//! - **Memory Counter Store**: Same semantics in process, for dry runs and tests
//!
//! ## Example
//!
//! ```ignore
//! use stats_cache::{RedisCounterStore, RedisPool, RedisPoolConfig};
//! use stats_core::CounterStore;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RedisCounterStore::new(pool);
//!
//! store.hash_increment("messages", "general", 1).await?;
//! let counts = store.hash_get_all("messages").await?;
//! ```

pub mod counters;
pub mod pool;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export store types
pub use counters::{MemoryCounterStore, RedisCounterStore};
