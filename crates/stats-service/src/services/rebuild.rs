//! Rebuilder
//!
//! Administrative reset-and-rebuild and the incremental catch-up walk.

use async_trait::async_trait;
use stats_core::entities::Channel;
use stats_core::{ChatClient, PortResult, Snowflake};
use tracing::{info, instrument, warn};

use super::context::StatsContext;
use super::error::ServiceResult;
use super::walker::{ChannelWalker, WalkOutcome};
use super::watermark::WatermarkTracker;

/// Store-wide steps of a full reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildStage {
    /// Persisting the current store to disk
    Snapshot,
    /// Removing every key
    Clear,
}

/// Progress hooks for a rebuild
///
/// Errors returned by a hook abort the rebuild.
#[async_trait]
pub trait RebuildObserver: Send + Sync {
    /// A store-wide step is about to run
    async fn stage(&self, _stage: RebuildStage) -> ServiceResult<()> {
        Ok(())
    }

    /// A channel walk is about to start
    async fn channel_started(
        &self,
        _channel: &Channel,
        _resume_after: Option<Snowflake>,
    ) -> ServiceResult<()> {
        Ok(())
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RebuildObserver for NoopObserver {}

/// Walks completed by one rebuild, in channel order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub channels: Vec<WalkOutcome>,
}

impl RebuildSummary {
    /// Total number of messages counted
    pub fn messages_seen(&self) -> usize {
        self.channels.iter().map(|c| c.messages_seen).sum()
    }
}

/// Channels of a guild that have walkable history
pub(crate) async fn eligible_channels(
    chat: &dyn ChatClient,
    guild_id: Snowflake,
) -> PortResult<Vec<Channel>> {
    let channels = chat.guild_channels(guild_id).await?;
    Ok(channels.into_iter().filter(Channel::is_eligible).collect())
}

/// Rebuilder
pub struct Rebuilder<'a> {
    ctx: &'a StatsContext,
}

impl<'a> Rebuilder<'a> {
    /// Create a new Rebuilder
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Snapshot, clear the whole store, then walk every channel from the start
    #[instrument(skip(self, observer))]
    pub async fn reset_and_rebuild_all(
        &self,
        guild_id: Snowflake,
        observer: &dyn RebuildObserver,
    ) -> ServiceResult<RebuildSummary> {
        let store = self.ctx.store();

        observer.stage(RebuildStage::Snapshot).await?;
        store.snapshot().await?;

        observer.stage(RebuildStage::Clear).await?;
        store.clear_all().await?;

        let walker = ChannelWalker::new(self.ctx);
        let mut summary = RebuildSummary::default();

        for channel in eligible_channels(self.ctx.chat(), guild_id).await? {
            observer.channel_started(&channel, None).await?;
            summary.channels.push(walker.walk(&channel, None, None).await?);
        }

        info!(
            guild_id = %guild_id,
            channels = summary.channels.len(),
            messages = summary.messages_seen(),
            "Full rebuild complete"
        );
        Ok(summary)
    }

    /// Walk every channel from its watermark, or from the start without one
    #[instrument(skip(self, observer))]
    pub async fn incremental_rebuild_all(
        &self,
        guild_id: Snowflake,
        observer: &dyn RebuildObserver,
    ) -> ServiceResult<RebuildSummary> {
        let walker = ChannelWalker::new(self.ctx);
        let mut summary = RebuildSummary::default();

        for channel in eligible_channels(self.ctx.chat(), guild_id).await? {
            let resume_after = self.resume_point(&channel).await?;
            observer.channel_started(&channel, resume_after).await?;
            summary
                .channels
                .push(walker.walk(&channel, resume_after, None).await?);
        }

        info!(
            guild_id = %guild_id,
            channels = summary.channels.len(),
            messages = summary.messages_seen(),
            "Incremental rebuild complete"
        );
        Ok(summary)
    }

    /// Watermark of a channel, if the message it names still exists
    async fn resume_point(&self, channel: &Channel) -> ServiceResult<Option<Snowflake>> {
        let Some(message_id) = WatermarkTracker::new(self.ctx).get(channel.id).await? else {
            return Ok(None);
        };

        match self.ctx.chat().fetch_message(channel.id, message_id).await {
            Ok(Some(message)) => Ok(Some(message.id)),
            Ok(None) => {
                warn!(
                    channel_id = %channel.id,
                    message_id = %message_id,
                    "Watermark message is gone, walking the whole channel"
                );
                Ok(None)
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    channel_id = %channel.id,
                    message_id = %message_id,
                    error = %e,
                    "Watermark message is gone, walking the whole channel"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
