//! # stats-core
//!
//! Domain layer containing entities, value objects, port traits and errors
//! for the chat statistics bot.
//! This crate has zero dependencies on infrastructure (Redis, HTTP, WebSocket).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Channel, ChannelType, Emoji, GuildMember, Message, MessageReaction, Role, User};
pub use error::DomainError;
pub use traits::{ChatClient, CounterStore, HistoryQuery, PortResult, MAX_PAGE_SIZE};
pub use value_objects::{
    Snowflake, SnowflakeParseError, StatKind, StatKindParseError, StatScope, STARTUP_KEY,
    WATERMARK_KEY,
};
