//! Dispatch events consumed by the bot

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stats_core::entities::{Emoji, Message, User};
use stats_core::Snowflake;

/// User object embedded in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub bot: bool,
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        Self {
            id: payload.id,
            username: payload.username,
            discriminator: payload.discriminator,
            bot: payload.bot,
        }
    }
}

/// Guild listed in READY
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRef {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

/// READY event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    #[serde(default)]
    pub v: i32,
    pub user: UserPayload,
    #[serde(default)]
    pub guilds: Vec<GuildRef>,
    pub session_id: String,
}

/// Reaction summary embedded in a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionPayload {
    pub emoji: String,
    pub count: i64,
}

/// MESSAGE_CREATE event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub reactions: Vec<ReactionPayload>,
}

impl MessageCreateEvent {
    /// Convert into a domain message
    #[must_use]
    pub fn into_message(self) -> Message {
        let mut message = Message::new(self.id, self.channel_id, self.author.into(), self.content);
        message.guild_id = self.guild_id;
        for reaction in self.reactions {
            message = message.with_reaction(Emoji::parse(&reaction.emoji), reaction.count);
        }
        message
    }
}

/// A decoded dispatch event
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Ready(ReadyEvent),
    MessageCreate(Box<MessageCreateEvent>),
    /// Any event the bot does not act on
    Other(String),
}

impl GatewayEvent {
    /// Decode the payload of a dispatch frame
    pub fn from_dispatch(event_type: &str, data: Value) -> Result<Self, serde_json::Error> {
        Ok(match event_type {
            "READY" => Self::Ready(serde_json::from_value(data)?),
            "MESSAGE_CREATE" => Self::MessageCreate(Box::new(serde_json::from_value(data)?)),
            other => Self::Other(other.to_string()),
        })
    }

    /// Event type name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ready(_) => "READY",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
            Self::Other(name) => name,
        }
    }
}
