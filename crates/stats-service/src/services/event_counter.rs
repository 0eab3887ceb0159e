//! Event counter
//!
//! Turns one message (and the reactions on it) into counter increments.

use std::collections::HashSet;

use stats_core::entities::{Emoji, Message};
use stats_core::{ChatClient, PortResult, Snowflake, StatKind, StatScope, MAX_PAGE_SIZE};
use tracing::{debug, instrument};

use super::context::StatsContext;
use super::error::ServiceResult;

/// Event counter
pub struct EventCounter<'a> {
    ctx: &'a StatsContext,
}

impl<'a> EventCounter<'a> {
    /// Create a new EventCounter
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Count one message in `channel_name`, globally and for its author
    ///
    /// Unconditional: calling twice for the same message counts it twice.
    #[instrument(skip(self))]
    pub async fn record_message(
        &self,
        author_id: Snowflake,
        channel_name: &str,
    ) -> ServiceResult<()> {
        let store = self.ctx.store();
        store
            .hash_increment(&StatScope::Global.key(StatKind::Message), channel_name, 1)
            .await?;
        store
            .hash_increment(
                &StatScope::User(author_id).key(StatKind::Message),
                channel_name,
                1,
            )
            .await?;
        Ok(())
    }

    /// Count the custom-emote reactions on a message
    ///
    /// Each distinct human reactor adds one to their own emote counter; the
    /// global counter gets the number of qualifying reactors in one call.
    /// Returns the total number of increments applied to the global counters.
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    pub async fn record_reactions(&self, message: &Message) -> ServiceResult<i64> {
        let store = self.ctx.store();
        let global_key = StatScope::Global.key(StatKind::Emote);
        let mut total = 0;

        for reaction in message.custom_reactions() {
            let reactors = qualifying_reactors(
                self.ctx.chat(),
                message.channel_id,
                message.id,
                &reaction.emoji,
            )
            .await?;
            if reactors.is_empty() {
                continue;
            }

            let emote = reaction.emoji.name();
            for user_id in &reactors {
                store
                    .hash_increment(&StatScope::User(*user_id).key(StatKind::Emote), emote, 1)
                    .await?;
            }

            let count = i64::try_from(reactors.len()).unwrap_or(i64::MAX);
            store.hash_increment(&global_key, emote, count).await?;
            total += count;

            debug!(emote, reactors = count, "Reaction counted");
        }

        Ok(total)
    }

    /// Count a message and its reactions
    pub async fn record(&self, message: &Message, channel_name: &str) -> ServiceResult<()> {
        self.record_message(message.author.id, channel_name).await?;
        self.record_reactions(message).await?;
        Ok(())
    }
}

/// Distinct non-bot users who reacted to a message with `emoji`
///
/// Walks every page of reactors, in id order, until a short page comes back.
pub(crate) async fn qualifying_reactors(
    chat: &dyn ChatClient,
    channel_id: Snowflake,
    message_id: Snowflake,
    emoji: &Emoji,
) -> PortResult<Vec<Snowflake>> {
    let api_name = emoji.api_name();
    let mut seen = HashSet::new();
    let mut reactors = Vec::new();
    let mut after: Option<Snowflake> = None;

    loop {
        let page = chat
            .reaction_users(channel_id, message_id, &api_name, after, MAX_PAGE_SIZE)
            .await?;
        let page_len = page.len();
        let last = page.iter().map(|user| user.id).max();

        for user in page {
            if !user.is_bot() && seen.insert(user.id) {
                reactors.push(user.id);
            }
        }

        // Stop on a short page or a cursor that did not move
        match last {
            Some(last) if page_len >= MAX_PAGE_SIZE && after.map_or(true, |a| last > a) => {
                after = Some(last);
            }
            _ => break,
        }
    }

    Ok(reactors)
}
