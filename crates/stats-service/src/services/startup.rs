//! Start-up record
//!
//! A human-readable timestamp written once per process start.

use chrono::Local;
use stats_core::STARTUP_KEY;
use tracing::instrument;

use super::context::StatsContext;
use super::error::ServiceResult;

/// Local-time format of the start-up record
pub const STARTUP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Start-up record
pub struct StartupRecord<'a> {
    ctx: &'a StatsContext,
}

impl<'a> StartupRecord<'a> {
    /// Create a new StartupRecord
    pub fn new(ctx: &'a StatsContext) -> Self {
        Self { ctx }
    }

    /// Store the current local time and return it
    #[instrument(skip(self))]
    pub async fn record(&self) -> ServiceResult<String> {
        let now = Local::now().format(STARTUP_FORMAT).to_string();
        self.ctx.store().set(STARTUP_KEY, &now).await?;
        Ok(now)
    }

    /// Read the stored start-up time
    pub async fn read(&self) -> ServiceResult<Option<String>> {
        Ok(self.ctx.store().get(STARTUP_KEY).await?)
    }
}
