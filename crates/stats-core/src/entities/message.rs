//! Message entity - a historical or live chat message with its reactions

use chrono::{DateTime, Utc};

use super::{Emoji, User};
use crate::value_objects::Snowflake;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reactions: Vec<MessageReaction>,
}

impl Message {
    /// Create a new Message; the creation time is derived from the id
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author: User,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            guild_id: None,
            author,
            content: content.into(),
            created_at: id.created_at(),
            reactions: Vec::new(),
        }
    }

    /// Attach a reaction summary
    #[must_use]
    pub fn with_reaction(mut self, emoji: Emoji, count: i64) -> Self {
        self.reactions.push(MessageReaction { emoji, count });
        self
    }

    /// Reactions that use a custom emote
    pub fn custom_reactions(&self) -> impl Iterator<Item = &MessageReaction> {
        self.reactions.iter().filter(|r| r.emoji.is_custom())
    }

    /// Whether `self` is more recent than `other`
    ///
    /// Compares creation time, then id.
    #[inline]
    pub fn is_newer_than(&self, other: &Message) -> bool {
        (self.created_at, self.id) > (other.created_at, other.id)
    }
}

/// Reaction summary attached to a message (one entry per emoji)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReaction {
    pub emoji: Emoji,
    pub count: i64,
}
