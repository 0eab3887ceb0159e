//! Watermark tracker
//!
//! Remembers, per channel, the newest message a completed walk has seen.

use stats_core::{Snowflake, WATERMARK_KEY};
use tracing::{instrument, warn};

use super::context::StatsContext;
use super::error::ServiceResult;

/// Watermark tracker
pub struct WatermarkTracker<'a> {
    ctx: &'a StatsContext,
}

impl<'a> WatermarkTracker<'a> {
    /// Create a new WatermarkTracker
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Last processed message of a channel
    ///
    /// A stored value that is not a message id reads as absent.
    #[instrument(skip(self))]
    pub async fn get(&self, channel_id: Snowflake) -> ServiceResult<Option<Snowflake>> {
        let field = channel_id.to_string();
        let Some(raw) = self.ctx.store().hash_get(WATERMARK_KEY, &field).await? else {
            return Ok(None);
        };

        match Snowflake::parse(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!(channel_id = %channel_id, value = %raw, error = %e, "Ignoring unparsable watermark");
                Ok(None)
            }
        }
    }

    /// Record the last processed message of a channel
    #[instrument(skip(self))]
    pub async fn set(&self, channel_id: Snowflake, message_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .store()
            .hash_set(WATERMARK_KEY, &channel_id.to_string(), &message_id.to_string())
            .await?;
        Ok(())
    }
}
