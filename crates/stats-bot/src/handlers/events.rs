//! Dispatch event handling
//!
//! READY logs the session; MESSAGE_CREATE either runs a command in its own
//! task or, when live counting is on, counts the message inline.

use std::sync::Arc;

use dashmap::DashMap;
use stats_core::Snowflake;
use stats_service::{CommandInvocation, CommandSurface, EventCounter, ServiceResult, StartupRecord};
use tracing::{debug, error, info, warn};

use crate::protocol::{GatewayEvent, MessageCreateEvent, ReadyEvent};

/// Routes gateway events to the stats services
pub struct EventHandler {
    surface: Arc<CommandSurface>,
    live_counting: bool,
    channel_names: DashMap<Snowflake, String>,
}

impl EventHandler {
    /// Create a new EventHandler
    pub fn new(surface: Arc<CommandSurface>, live_counting: bool) -> Self {
        Self {
            surface,
            live_counting,
            channel_names: DashMap::new(),
        }
    }

    /// Handle one dispatch event
    pub async fn handle(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Ready(ready) => self.on_ready(ready).await,
            GatewayEvent::MessageCreate(created) => self.on_message(*created).await,
            GatewayEvent::Other(name) => debug!(event = %name, "Ignoring dispatch event"),
        }
    }

    async fn on_ready(&self, ready: ReadyEvent) {
        let started = StartupRecord::new(self.surface.context()).read().await;
        match started {
            Ok(started) => info!(
                user = %ready.user.username,
                user_id = %ready.user.id,
                guilds = ready.guilds.len(),
                started = started.as_deref().unwrap_or("unknown"),
                "Logged in"
            ),
            Err(e) => warn!(error = %e, "Failed to read startup record"),
        }
    }

    async fn on_message(&self, event: MessageCreateEvent) {
        let Some(guild_id) = event.guild_id else {
            return;
        };

        if !event.author.bot && self.surface.is_command(&event.content) {
            let invocation = CommandInvocation {
                guild_id,
                channel_id: event.channel_id,
                author_id: event.author.id,
                content: event.content,
            };
            let surface = Arc::clone(&self.surface);
            tokio::spawn(async move {
                if let Err(e) = surface.handle(&invocation).await {
                    error!(error = %e, "Failed to deliver command reply");
                }
            });
            return;
        }

        if self.live_counting {
            if let Err(e) = self.count(event.author.id, event.channel_id).await {
                warn!(
                    error = %e,
                    channel_id = %event.channel_id,
                    "Failed to count live message"
                );
            }
        }
    }

    async fn count(&self, author_id: Snowflake, channel_id: Snowflake) -> ServiceResult<()> {
        let channel_name = self.channel_name(channel_id).await?;
        EventCounter::new(self.surface.context())
            .record_message(author_id, &channel_name)
            .await
    }

    async fn channel_name(&self, channel_id: Snowflake) -> ServiceResult<String> {
        if let Some(name) = self.channel_names.get(&channel_id) {
            return Ok(name.clone());
        }

        let channel = self.surface.context().chat().channel(channel_id).await?;
        let name = channel.display_name();
        self.channel_names.insert(channel_id, name.clone());
        Ok(name)
    }
}
