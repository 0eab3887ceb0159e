//! REST response bodies and their domain mappings

use serde::{Deserialize, Serialize};
use stats_core::entities::{Channel, ChannelType, Emoji, GuildMember, Message, Role, User};
use stats_core::Snowflake;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserDto {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub bot: bool,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            discriminator: dto.discriminator,
            bot: dto.bot,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChannelDto {
    pub id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: i32,
}

impl From<ChannelDto> for Channel {
    fn from(dto: ChannelDto) -> Self {
        Self {
            id: dto.id,
            guild_id: dto.guild_id,
            name: dto.name,
            channel_type: ChannelType::from(dto.channel_type),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReactionDto {
    pub emoji: String,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageDto {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserDto,
    #[serde(default)]
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub reactions: Vec<ReactionDto>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        let message = Self {
            id: dto.id,
            channel_id: dto.channel_id,
            guild_id: dto.guild_id,
            author: dto.author.into(),
            content: dto.content,
            created_at: dto.timestamp,
            reactions: Vec::new(),
        };
        dto.reactions.into_iter().fold(message, |message, reaction| {
            message.with_reaction(Emoji::parse(&reaction.emoji), reaction.count)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoleDto {
    pub id: Snowflake,
    pub name: String,
}

impl From<RoleDto> for Role {
    fn from(dto: RoleDto) -> Self {
        Role::new(dto.id, dto.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MemberDto {
    pub user: UserDto,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl From<MemberDto> for GuildMember {
    fn from(dto: MemberDto) -> Self {
        Self {
            user: dto.user.into(),
            nickname: dto.nickname,
            roles: dto.roles,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateMessageRequest<'a> {
    pub content: &'a str,
}
