//! Command dispatch
//!
//! Checks roles, runs the matching service and replies in the invoking
//! channel. Failures are reported back to the channel as text.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use stats_common::StatsConfig;
use stats_core::entities::Channel;
use stats_core::{ChatClient, Snowflake, StatKind, StatScope};
use tracing::{info, instrument, warn};

use super::parser::Command;
use crate::services::reporter::code_block;
use crate::services::{
    RebuildObserver, RebuildStage, Rebuilder, ReactionTally, Reporter, ServiceError,
    ServiceResult, StatsContext,
};

/// Reply sent when the caller lacks the admin role
pub const MISSING_ROLE_REPLY: &str = "You aren't the proper role for this command!";

/// Members fetched when picking a random user
const RANDOM_USER_POOL: usize = 1000;

/// Command surface settings
#[derive(Debug, Clone)]
pub struct SurfaceSettings {
    pub prefix: String,
    pub admin_role: String,
    pub calc_message_limit: usize,
    pub response_size: usize,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self::from(&StatsConfig::default())
    }
}

impl From<&StatsConfig> for SurfaceSettings {
    fn from(config: &StatsConfig) -> Self {
        Self {
            prefix: config.command_prefix.clone(),
            admin_role: config.admin_role.clone(),
            calc_message_limit: config.calc_message_limit,
            response_size: config.response_size,
        }
    }
}

/// Where a command came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
}

/// User-facing text for a failed command
pub fn error_reply(err: &ServiceError) -> String {
    if err.is_permission() {
        MISSING_ROLE_REPLY.to_string()
    } else {
        format!("Error occurred processing your request : {err}")
    }
}

/// Command surface
pub struct CommandSurface {
    ctx: StatsContext,
    settings: SurfaceSettings,
}

impl CommandSurface {
    /// Create a new CommandSurface
    pub fn new(ctx: StatsContext, settings: SurfaceSettings) -> Self {
        Self { ctx, settings }
    }

    pub fn context(&self) -> &StatsContext {
        &self.ctx
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    /// Whether a message names a known command
    ///
    /// A known command with bad arguments still counts, so the caller gets
    /// the error reply. Anything else with the prefix (`~~strike~~`, `~dance`)
    /// is plain chat.
    pub fn is_command(&self, content: &str) -> bool {
        !matches!(
            Command::parse(content, &self.settings.prefix),
            Ok(None)
        )
    }

    /// Parse and run a command, replying with the result or the error
    ///
    /// Returns `false` when the message is not a known command.
    #[instrument(skip(self, invocation), fields(guild_id = %invocation.guild_id, channel_id = %invocation.channel_id))]
    pub async fn handle(&self, invocation: &CommandInvocation) -> ServiceResult<bool> {
        let outcome = match Command::parse(&invocation.content, &self.settings.prefix) {
            Ok(None) => return Ok(false),
            Ok(Some(command)) => {
                info!(command = command.name(), author_id = %invocation.author_id, "Running command");
                self.execute(invocation, &command).await
            }
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            warn!(error = %e, code = e.error_code(), "Command failed");
            self.reply(invocation.channel_id, &error_reply(&e)).await?;
        }
        Ok(true)
    }

    /// Run a parsed command
    pub async fn execute(
        &self,
        invocation: &CommandInvocation,
        command: &Command,
    ) -> ServiceResult<()> {
        if command.requires_admin() {
            self.require_admin(invocation.guild_id, invocation.author_id)
                .await?;
        }

        match command {
            Command::GetStats { kind, users } => self.get_stats(invocation, *kind, users).await,
            Command::StoreStats => self.store_stats(invocation).await,
            Command::AddStats => self.add_stats(invocation).await,
            Command::CalcStats {
                msg_limit,
                response_size,
            } => {
                self.calc_stats(
                    invocation,
                    msg_limit.unwrap_or(self.settings.calc_message_limit),
                    response_size.unwrap_or(self.settings.response_size),
                )
                .await
            }
            Command::RandomUser => self.random_user(invocation).await,
            Command::RandomEmote => self.random_emote(invocation).await,
        }
    }

    async fn require_admin(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let chat = self.ctx.chat();
        let member = chat.guild_member(guild_id, user_id).await?;
        let roles = chat.guild_roles(guild_id).await?;

        if member.has_role_named(&self.settings.admin_role, &roles) {
            Ok(())
        } else {
            Err(ServiceError::permission_denied(&self.settings.admin_role))
        }
    }

    async fn get_stats(
        &self,
        invocation: &CommandInvocation,
        kind: StatKind,
        users: &[Snowflake],
    ) -> ServiceResult<()> {
        let reporter = Reporter::new(&self.ctx);
        let scopes: Vec<StatScope> = if users.is_empty() {
            vec![StatScope::Global]
        } else {
            users.iter().copied().map(StatScope::User).collect()
        };

        for scope in scopes {
            let report = reporter.report(scope, kind).await?;
            self.reply(invocation.channel_id, &code_block(&report.render()))
                .await?;
        }
        Ok(())
    }

    async fn store_stats(&self, invocation: &CommandInvocation) -> ServiceResult<()> {
        let narrator = Narrator::new(self.ctx.chat(), invocation.channel_id);
        Rebuilder::new(&self.ctx)
            .reset_and_rebuild_all(invocation.guild_id, &narrator)
            .await?;
        self.reply(invocation.channel_id, "Processed all messages!")
            .await
    }

    async fn add_stats(&self, invocation: &CommandInvocation) -> ServiceResult<()> {
        let narrator = Narrator::new(self.ctx.chat(), invocation.channel_id);
        Rebuilder::new(&self.ctx)
            .incremental_rebuild_all(invocation.guild_id, &narrator)
            .await?;
        self.reply(invocation.channel_id, "Processed all messages!")
            .await
    }

    async fn calc_stats(
        &self,
        invocation: &CommandInvocation,
        msg_limit: usize,
        response_size: usize,
    ) -> ServiceResult<()> {
        let report = ReactionTally::new(&self.ctx)
            .calculate(invocation.guild_id, msg_limit)
            .await?;

        let chunks = report.chunks(response_size);
        if chunks.is_empty() {
            return self.reply(invocation.channel_id, &code_block("")).await;
        }
        for chunk in chunks {
            self.reply(invocation.channel_id, &code_block(&chunk))
                .await?;
        }
        Ok(())
    }

    async fn random_user(&self, invocation: &CommandInvocation) -> ServiceResult<()> {
        let members = self
            .ctx
            .chat()
            .guild_members(invocation.guild_id, RANDOM_USER_POOL)
            .await?;

        let pick = members
            .choose(&mut rand::thread_rng())
            .map(|member| member.display_name().to_string());

        match pick {
            Some(name) => self.reply(invocation.channel_id, &name).await,
            None => Err(ServiceError::validation("no members to pick from")),
        }
    }

    async fn random_emote(&self, invocation: &CommandInvocation) -> ServiceResult<()> {
        let report = Reporter::new(&self.ctx)
            .report(StatScope::Global, StatKind::Emote)
            .await?;

        let pick = report
            .entries()
            .choose(&mut rand::thread_rng())
            .map(|entry| entry.name.clone());

        match pick {
            Some(name) => self.reply(invocation.channel_id, &name).await,
            None => Err(ServiceError::validation("no emotes recorded yet")),
        }
    }

    async fn reply(&self, channel_id: Snowflake, content: &str) -> ServiceResult<()> {
        self.ctx.chat().send_message(channel_id, content).await?;
        Ok(())
    }
}

/// Narrates rebuild progress into the invoking channel
struct Narrator<'a> {
    chat: &'a dyn ChatClient,
    channel_id: Snowflake,
}

impl<'a> Narrator<'a> {
    fn new(chat: &'a dyn ChatClient, channel_id: Snowflake) -> Self {
        Self { chat, channel_id }
    }
}

#[async_trait]
impl RebuildObserver for Narrator<'_> {
    async fn stage(&self, stage: RebuildStage) -> ServiceResult<()> {
        let text = match stage {
            RebuildStage::Snapshot => "Saving current db image to disk",
            RebuildStage::Clear => "Flushing db",
        };
        self.chat.send_message(self.channel_id, text).await?;
        Ok(())
    }

    async fn channel_started(
        &self,
        channel: &Channel,
        resume_after: Option<Snowflake>,
    ) -> ServiceResult<()> {
        let name = channel.display_name();
        let text = match resume_after {
            Some(message_id) => {
                format!("Processing messages in channel: {name} for message: {message_id}")
            }
            None => format!("Processing messages in channel: {name}"),
        };
        self.chat.send_message(self.channel_id, &text).await?;
        Ok(())
    }
}
