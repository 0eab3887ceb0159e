//! Channel entity - represents a text channel, DM, or category

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Channel type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText = 0,
    /// Direct message between users
    Dm = 1,
    /// Guild voice channel
    GuildVoice = 2,
    /// Guild category for organizing channels
    GuildCategory = 4,
}

impl ChannelType {
    /// Whether channels of this type carry a message history the bot walks
    #[inline]
    #[must_use]
    pub fn has_history(self) -> bool {
        matches!(self, Self::GuildText)
    }
}

impl From<i32> for ChannelType {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::Dm,
            2 => Self::GuildVoice,
            4 => Self::GuildCategory,
            _ => Self::GuildText,
        }
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub channel_type: ChannelType,
}

impl Channel {
    /// Create a new guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: Some(name.into()),
            channel_type: ChannelType::GuildText,
        }
    }

    /// Create a new guild category
    #[must_use]
    pub fn new_category(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            channel_type: ChannelType::GuildCategory,
            ..Self::new_text(id, guild_id, name)
        }
    }

    /// Whether the stats walkers should visit this channel
    #[inline]
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.guild_id.is_some() && self.channel_type.has_history()
    }

    /// Name used as the message-counter field
    ///
    /// Falls back to the channel id for unnamed channels.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
