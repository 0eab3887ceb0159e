//! Stats services
//!
//! Each service borrows the shared [`StatsContext`] and is cheap to build per
//! call, like the counter and walker used inside a rebuild.

pub mod context;
pub mod error;
pub mod event_counter;
pub mod history;
pub mod rebuild;
pub mod reporter;
pub mod startup;
pub mod tally;
pub mod walker;
pub mod watermark;

pub use context::StatsContext;
pub use error::{ServiceError, ServiceResult};
pub use event_counter::EventCounter;
pub use history::channel_history;
pub use rebuild::{NoopObserver, RebuildObserver, RebuildStage, RebuildSummary, Rebuilder};
pub use reporter::{Report, ReportEntry, Reporter};
pub use startup::StartupRecord;
pub use tally::ReactionTally;
pub use walker::{ChannelWalker, WalkOutcome};
pub use watermark::WatermarkTracker;
