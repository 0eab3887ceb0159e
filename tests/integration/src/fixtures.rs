//! Test fixtures and data generators
//!
//! [`FakeChat`] is an in-memory chat server implementing [`ChatClient`]. It
//! pages history the way the real server does (newest first, or oldest first
//! after a cursor) and records every message the bot sends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use stats_core::entities::{Channel, Emoji, GuildMember, Message, Role, User};
use stats_core::{ChatClient, DomainError, HistoryQuery, PortResult, Snowflake};

/// Guild used by every fixture unless a test says otherwise
pub const GUILD_ID: Snowflake = Snowflake::new(1);

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Human user with a predictable name
pub fn user(id: i64) -> User {
    User::new(Snowflake::new(id), format!("user{id}"))
}

/// Bot user with a predictable name
pub fn bot(id: i64) -> User {
    User::new_bot(Snowflake::new(id), format!("bot{id}"))
}

/// Guild text message
pub fn message(id: i64, channel: &Channel, author: &User) -> Message {
    let mut message = Message::new(
        Snowflake::new(id),
        channel.id,
        author.clone(),
        format!("message {id}"),
    );
    message.guild_id = channel.guild_id;
    message
}

/// Custom emote with a predictable id
pub fn emote(name: &str, id: i64) -> Emoji {
    Emoji::parse(&format!("{name}:{id}"))
}

/// Guild member holding the given roles
pub fn member(user: &User, roles: &[&Role]) -> GuildMember {
    GuildMember {
        user: user.clone(),
        nickname: None,
        roles: roles.iter().map(|r| r.id).collect(),
    }
}

#[derive(Default)]
struct Guild {
    channels: Vec<Channel>,
    messages: Vec<Message>,
    reactors: HashMap<(Snowflake, String), Vec<User>>,
    members: Vec<GuildMember>,
    roles: Vec<Role>,
}

/// In-memory chat server
#[derive(Default)]
pub struct FakeChat {
    guild: RwLock<Guild>,
    sent: Mutex<Vec<(Snowflake, String)>>,
    fail_history: AtomicBool,
    history_calls: AtomicUsize,
}

impl FakeChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text channel to [`GUILD_ID`]
    pub fn add_text_channel(&self, id: i64, name: &str) -> Channel {
        let channel = Channel::new_text(Snowflake::new(id), GUILD_ID, name);
        self.guild.write().channels.push(channel.clone());
        channel
    }

    /// Add a category to [`GUILD_ID`]
    pub fn add_category(&self, id: i64, name: &str) -> Channel {
        let channel = Channel::new_category(Snowflake::new(id), GUILD_ID, name);
        self.guild.write().channels.push(channel.clone());
        channel
    }

    /// Post `count` messages by `author`, with consecutive ids from `first_id`
    pub fn post_many(&self, channel: &Channel, author: &User, first_id: i64, count: i64) {
        let mut guild = self.guild.write();
        for id in first_id..first_id + count {
            guild.messages.push(message(id, channel, author));
        }
    }

    /// Post one message
    pub fn post(&self, message: Message) {
        self.guild.write().messages.push(message);
    }

    /// React to a message; the reaction summary follows the reactor list
    pub fn react(&self, message_id: i64, emoji: &Emoji, users: &[User]) {
        let message_id = Snowflake::new(message_id);
        let mut guild = self.guild.write();

        let reactors = guild
            .reactors
            .entry((message_id, emoji.api_name()))
            .or_default();
        reactors.extend(users.iter().cloned());
        reactors.sort_by_key(|u| u.id);
        let count = reactors.len() as i64;

        if let Some(message) = guild.messages.iter_mut().find(|m| m.id == message_id) {
            message.reactions.retain(|r| r.emoji != *emoji);
            *message = message.clone().with_reaction(emoji.clone(), count);
        }
    }

    /// Delete a message
    pub fn delete(&self, message_id: i64) {
        let message_id = Snowflake::new(message_id);
        self.guild.write().messages.retain(|m| m.id != message_id);
    }

    pub fn add_role(&self, id: i64, name: &str) -> Role {
        let role = Role::new(Snowflake::new(id), name);
        self.guild.write().roles.push(role.clone());
        role
    }

    pub fn add_member(&self, member: GuildMember) {
        self.guild.write().members.push(member);
    }

    /// Make every history fetch fail
    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    /// Number of history pages requested so far
    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    /// Contents of every message the bot sent, in order
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    /// Forget the sent messages
    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn guild_channels(&self, guild_id: Snowflake) -> PortResult<Vec<Channel>> {
        Ok(self
            .guild
            .read()
            .channels
            .iter()
            .filter(|c| c.guild_id == Some(guild_id))
            .cloned()
            .collect())
    }

    async fn channel(&self, channel_id: Snowflake) -> PortResult<Channel> {
        self.guild
            .read()
            .channels
            .iter()
            .find(|c| c.id == channel_id)
            .cloned()
            .ok_or(DomainError::ChannelNotFound(channel_id))
    }

    async fn fetch_messages(
        &self,
        channel_id: Snowflake,
        query: HistoryQuery,
    ) -> PortResult<Vec<Message>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(DomainError::HistoryFetchError(
                "connection reset by peer".to_string(),
            ));
        }

        let mut page: Vec<Message> = self
            .guild
            .read()
            .messages
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .filter(|m| query.after.map_or(true, |a| m.id > a))
            .filter(|m| query.before.map_or(true, |b| m.id < b))
            .cloned()
            .collect();

        if query.after.is_some() {
            page.sort_by_key(|m| m.id);
        } else {
            page.sort_by_key(|m| std::cmp::Reverse(m.id));
        }
        page.truncate(query.limit);
        Ok(page)
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<Option<Message>> {
        Ok(self
            .guild
            .read()
            .messages
            .iter()
            .find(|m| m.channel_id == channel_id && m.id == message_id)
            .cloned())
    }

    async fn reaction_users(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        after: Option<Snowflake>,
        limit: usize,
    ) -> PortResult<Vec<User>> {
        let guild = self.guild.read();
        let Some(users) = guild.reactors.get(&(message_id, emoji.to_string())) else {
            return Ok(Vec::new());
        };

        Ok(users
            .iter()
            .filter(|u| after.map_or(true, |a| u.id > a))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<()> {
        self.sent.lock().push((channel_id, content.to_string()));
        Ok(())
    }

    async fn guild_members(
        &self,
        _guild_id: Snowflake,
        limit: usize,
    ) -> PortResult<Vec<GuildMember>> {
        Ok(self
            .guild
            .read()
            .members
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn guild_member(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PortResult<GuildMember> {
        self.guild
            .read()
            .members
            .iter()
            .find(|m| m.user.id == user_id)
            .cloned()
            .ok_or(DomainError::MemberNotFound(user_id))
    }

    async fn guild_roles(&self, _guild_id: Snowflake) -> PortResult<Vec<Role>> {
        Ok(self.guild.read().roles.clone())
    }
}
