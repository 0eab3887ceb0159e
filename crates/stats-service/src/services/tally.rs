//! Reaction tally
//!
//! Counts custom-emote reactions over the newest messages of every channel
//! without touching the counter store.

use std::collections::HashMap;
use std::pin::pin;

use futures::TryStreamExt;
use stats_core::{Snowflake, StatKind, StatScope};
use tracing::{info, instrument};

use super::context::StatsContext;
use super::error::ServiceResult;
use super::event_counter::qualifying_reactors;
use super::history::channel_history;
use super::rebuild::eligible_channels;
use super::reporter::Report;

/// Reaction tally
pub struct ReactionTally<'a> {
    ctx: &'a StatsContext,
}

impl<'a> ReactionTally<'a> {
    /// Create a new ReactionTally
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Tally the newest `msg_limit` messages of each eligible channel
    #[instrument(skip(self))]
    pub async fn calculate(&self, guild_id: Snowflake, msg_limit: usize) -> ServiceResult<Report> {
        let chat = self.ctx.chat();
        let mut tally: HashMap<String, i64> = HashMap::new();

        for channel in eligible_channels(chat, guild_id).await? {
            let mut history = pin!(channel_history(chat, channel.id, None, Some(msg_limit)));

            while let Some(message) = history.try_next().await? {
                for reaction in message.custom_reactions() {
                    let reactors =
                        qualifying_reactors(chat, message.channel_id, message.id, &reaction.emoji)
                            .await?;
                    if reactors.is_empty() {
                        continue;
                    }
                    *tally.entry(reaction.emoji.name().to_string()).or_insert(0) +=
                        i64::try_from(reactors.len()).unwrap_or(i64::MAX);
                }
            }
        }

        info!(guild_id = %guild_id, emotes = tally.len(), "Reaction tally complete");
        Ok(Report::from_counts(StatScope::Global, StatKind::Emote, tally))
    }
}
