//! Counter store implementations.

mod memory_store;
mod redis_store;

pub use memory_store::MemoryCounterStore;
pub use redis_store::RedisCounterStore;
