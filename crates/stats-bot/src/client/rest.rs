//! REST chat client
//!
//! Implements [`ChatClient`] over the chat server's `/api/v1` HTTP API.

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use stats_common::ChatConfig;
use stats_core::entities::{Channel, GuildMember, Message, Role, User};
use stats_core::{ChatClient, DomainError, HistoryQuery, PortResult, Snowflake};
use tracing::{debug, instrument};

use super::dto::{ChannelDto, CreateMessageRequest, MemberDto, MessageDto, RoleDto, UserDto};
use super::error::RestError;

/// HTTP client for the chat server API
#[derive(Debug, Clone)]
pub struct RestChatClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl RestChatClient {
    /// Build a client from the chat configuration
    pub fn new(config: &ChatConfig) -> Result<Self, RestError> {
        let base =
            Url::parse(&config.api_url).map_err(|e| RestError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(RestError::InvalidUrl(config.api_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            token: config.token.clone(),
        })
    }

    /// `/api/v1/<segments...>` under the base URL, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RestError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RestError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, RestError> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        Ok(check(response).await?.json::<T>().await?)
    }
}

/// Turn a non-2xx response into an error carrying the body
async fn check(response: Response) -> Result<Response, RestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RestError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatClient for RestChatClient {
    async fn guild_channels(&self, guild_id: Snowflake) -> PortResult<Vec<Channel>> {
        let url = self.endpoint(&["guilds", &guild_id.to_string(), "channels"])?;
        let channels: Vec<ChannelDto> = self.get(url, &[]).await?;
        Ok(channels.into_iter().map(Channel::from).collect())
    }

    async fn channel(&self, channel_id: Snowflake) -> PortResult<Channel> {
        let url = self.endpoint(&["channels", &channel_id.to_string()])?;
        match self.get::<ChannelDto>(url, &[]).await {
            Ok(dto) => Ok(dto.into()),
            Err(e) if e.is_not_found() => Err(DomainError::ChannelNotFound(channel_id)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_messages(
        &self,
        channel_id: Snowflake,
        query: HistoryQuery,
    ) -> PortResult<Vec<Message>> {
        let url = self.endpoint(&["channels", &channel_id.to_string(), "messages"])?;

        let mut params = vec![("limit", query.limit.to_string())];
        if let Some(before) = query.before {
            params.push(("before", before.to_string()));
        }
        if let Some(after) = query.after {
            params.push(("after", after.to_string()));
        }

        let messages: Vec<MessageDto> = self.get(url, &params).await?;
        Ok(messages.into_iter().map(Message::from).collect())
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<Option<Message>> {
        let url = self.endpoint(&[
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
        ])?;
        match self.get::<MessageDto>(url, &[]).await {
            Ok(dto) => Ok(Some(dto.into())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        after: Option<Snowflake>,
        limit: usize,
    ) -> PortResult<Vec<User>> {
        let url = self.endpoint(&[
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
            "reactions",
            emoji,
        ])?;

        let mut params = vec![("limit", limit.to_string())];
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }

        let users: Vec<UserDto> = self.get(url, &params).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<()> {
        let url = self.endpoint(&["channels", &channel_id.to_string(), "messages"])?;
        debug!(url = %url, "POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&CreateMessageRequest { content })
            .send()
            .await
            .map_err(RestError::from)?;
        check(response).await?;
        Ok(())
    }

    async fn guild_members(
        &self,
        guild_id: Snowflake,
        limit: usize,
    ) -> PortResult<Vec<GuildMember>> {
        let url = self.endpoint(&["guilds", &guild_id.to_string(), "members"])?;
        let members: Vec<MemberDto> = self.get(url, &[("limit", limit.to_string())]).await?;
        Ok(members.into_iter().map(GuildMember::from).collect())
    }

    async fn guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PortResult<GuildMember> {
        let url = self.endpoint(&[
            "guilds",
            &guild_id.to_string(),
            "members",
            &user_id.to_string(),
        ])?;
        match self.get::<MemberDto>(url, &[]).await {
            Ok(dto) => Ok(dto.into()),
            Err(e) if e.is_not_found() => Err(DomainError::MemberNotFound(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn guild_roles(&self, guild_id: Snowflake) -> PortResult<Vec<Role>> {
        let url = self.endpoint(&["guilds", &guild_id.to_string(), "roles"])?;
        let roles: Vec<RoleDto> = self.get(url, &[]).await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }
}
