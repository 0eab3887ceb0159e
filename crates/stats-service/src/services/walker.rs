//! Channel walker
//!
//! Feeds a window of channel history through the [`EventCounter`] and moves
//! the channel watermark once the whole window has been counted.

use std::pin::pin;

use futures::TryStreamExt;
use stats_core::entities::{Channel, Message};
use stats_core::Snowflake;
use tracing::{info, instrument};

use super::context::StatsContext;
use super::error::ServiceResult;
use super::event_counter::EventCounter;
use super::history::channel_history;
use super::watermark::WatermarkTracker;

/// Result of one completed walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    pub channel_id: Snowflake,
    pub messages_seen: usize,
    /// Newest message seen, by creation time then id
    pub newest: Option<Snowflake>,
}

/// Channel walker
pub struct ChannelWalker<'a> {
    ctx: &'a StatsContext,
}

impl<'a> ChannelWalker<'a> {
    /// Create a new ChannelWalker
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Count every message in the window and advance the watermark
    ///
    /// `after` resumes strictly after a message; `limit` caps the number of
    /// messages. Any error aborts the walk and leaves the watermark alone.
    /// Counters touched before the error stay incremented.
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    pub async fn walk(
        &self,
        channel: &Channel,
        after: Option<Snowflake>,
        limit: Option<usize>,
    ) -> ServiceResult<WalkOutcome> {
        let channel_name = channel.display_name();
        let counter = EventCounter::new(self.ctx);
        let mut history = pin!(channel_history(self.ctx.chat(), channel.id, after, limit));

        let mut newest: Option<Message> = None;
        let mut messages_seen = 0;

        while let Some(message) = history.try_next().await? {
            counter.record(&message, &channel_name).await?;
            messages_seen += 1;

            if newest
                .as_ref()
                .map_or(true, |current| message.is_newer_than(current))
            {
                newest = Some(message);
            }
        }

        let newest = newest.map(|message| message.id);
        if let Some(message_id) = newest {
            WatermarkTracker::new(self.ctx)
                .set(channel.id, message_id)
                .await?;
        }

        info!(
            channel = %channel_name,
            messages = messages_seen,
            newest = ?newest,
            "Channel walk complete"
        );

        Ok(WalkOutcome {
            channel_id: channel.id,
            messages_seen,
            newest,
        })
    }
}
