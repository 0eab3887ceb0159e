//! Port traits - the interfaces the stats core consumes
//!
//! The domain layer defines what it needs from the counter store and the chat
//! server; the cache crate and the bot crate provide the implementations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{Channel, GuildMember, Message, Role, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for port operations
pub type PortResult<T> = Result<T, DomainError>;

// ============================================================================
// Counter Store
// ============================================================================

/// Durable key-value service holding every counter and watermark
///
/// Every call is a single round trip; no transactions are offered.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `field` of hash `key` by `amount`, returning the new value
    async fn hash_increment(&self, key: &str, field: &str, amount: i64) -> PortResult<i64>;

    /// Read every field of hash `key` (empty when the key does not exist)
    async fn hash_get_all(&self, key: &str) -> PortResult<HashMap<String, i64>>;

    /// Read one field of hash `key`
    async fn hash_get(&self, key: &str, field: &str) -> PortResult<Option<String>>;

    /// Overwrite one field of hash `key`
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> PortResult<()>;

    /// Read a plain string key
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    /// Overwrite a plain string key
    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Persist the whole store to durable storage
    async fn snapshot(&self) -> PortResult<()>;

    /// Remove every key (counters, watermarks and the startup record)
    async fn clear_all(&self) -> PortResult<()>;
}

// ============================================================================
// Chat Client
// ============================================================================

/// Maximum page size accepted by the chat server's list endpoints
pub const MAX_PAGE_SIZE: usize = 100;

/// Cursor for one page of channel history
///
/// Without `after` the server returns the newest messages first; with `after`
/// it returns the oldest messages strictly after the cursor first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub limit: usize,
}

impl HistoryQuery {
    /// Newest-first page, optionally older than `before`
    #[must_use]
    pub fn backward(before: Option<Snowflake>, limit: usize) -> Self {
        Self {
            before,
            after: None,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Oldest-first page strictly after `after`
    #[must_use]
    pub fn forward(after: Snowflake, limit: usize) -> Self {
        Self {
            before: None,
            after: Some(after),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Read access to the chat server, plus the few writes the command surface needs
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// List every channel of a guild
    async fn guild_channels(&self, guild_id: Snowflake) -> PortResult<Vec<Channel>>;

    /// Fetch a single channel
    async fn channel(&self, channel_id: Snowflake) -> PortResult<Channel>;

    /// Fetch one page of channel history
    async fn fetch_messages(
        &self,
        channel_id: Snowflake,
        query: HistoryQuery,
    ) -> PortResult<Vec<Message>>;

    /// Fetch a single message; `None` when it no longer exists
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<Option<Message>>;

    /// Fetch one page of users who reacted with `emoji`, ordered by id
    async fn reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        after: Option<Snowflake>,
        limit: usize,
    ) -> PortResult<Vec<User>>;

    /// Post a message to a channel
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<()>;

    /// List guild members (first page of up to `limit`)
    async fn guild_members(&self, guild_id: Snowflake, limit: usize)
        -> PortResult<Vec<GuildMember>>;

    /// Fetch one guild member
    async fn guild_member(&self, guild_id: Snowflake, user_id: Snowflake)
        -> PortResult<GuildMember>;

    /// List the roles defined in a guild
    async fn guild_roles(&self, guild_id: Snowflake) -> PortResult<Vec<Role>>;
}
